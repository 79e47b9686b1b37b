//! ShiftSync - workforce-portal shift schedule to calendar sync
//!
//! Main entry point for the `shiftsync` binary.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use shiftsync_cli::utils::logging::{error_label, exit_code, init_tracing};
use shiftsync_cli::{commands, AppContext, Cli};
use shiftsync_domain::ShiftSyncError;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    match run(&cli) {
        Ok(status) => {
            println!("{status}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let kind = err.downcast_ref::<ShiftSyncError>().map_or("internal", error_label);
            error!(kind, error = %format!("{err:#}"), "shiftsync failed");
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<Value> {
    let ctx = AppContext::load(cli.config.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    Ok(runtime.block_on(commands::dispatch(ctx, &cli.command))?)
}
