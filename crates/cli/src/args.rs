//! Command-line arguments

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use shiftsync_infra::CredentialOverrides;

#[derive(Parser, Debug)]
#[command(
    name = "shiftsync",
    author,
    version,
    about = "Mirror a workforce-portal shift schedule into a calendar",
    long_about = None
)]
pub struct Cli {
    /// Configuration file (TOML or JSON).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Log in, fetch this week's shifts and reconcile the calendar",
        after_help = "EXAMPLES:\n    shiftsync sync\n    shiftsync sync --date 2025-06-04 --headful"
    )]
    Sync(ScrapeArgs),

    #[command(
        about = "Log in, fetch and persist this week's shifts only",
        after_help = "EXAMPLES:\n    shiftsync fetch --schedule-dir ./data/schedules"
    )]
    Fetch(ScrapeArgs),

    #[command(
        about = "Reconcile the calendar against a stored schedule",
        after_help = "EXAMPLES:\n    shiftsync reconcile --schedule week.json --week-of 2025-06-04"
    )]
    Reconcile(ReconcileArgs),
}

/// Flags shared by the commands that may log in to the portal.
#[derive(Args, Debug, Clone, Default)]
pub struct ScrapeArgs {
    /// Run date (YYYY-MM-DD); keys the stored schedule and picks the week.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Directory holding per-day schedule artifacts.
    #[arg(long, value_name = "DIR")]
    pub schedule_dir: Option<PathBuf>,

    /// JSON file with `username` and `password`.
    #[arg(long, value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Portal username; overrides the credentials file or environment.
    #[arg(long)]
    pub username: Option<String>,

    /// Portal password; overrides the credentials file or environment.
    #[arg(long)]
    pub password: Option<String>,

    /// Show the browser window during login.
    #[arg(long)]
    pub headful: bool,
}

impl ScrapeArgs {
    pub fn credential_overrides(&self) -> CredentialOverrides {
        CredentialOverrides::new(self.username.clone(), self.password.clone())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ReconcileArgs {
    /// Stored schedule artifact to reconcile.
    #[arg(long, value_name = "FILE")]
    pub schedule: PathBuf,

    /// Any date in the week to reconcile (default: today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub week_of: Option<NaiveDate>,
}
