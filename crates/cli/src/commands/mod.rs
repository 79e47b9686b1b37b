//! `shiftsync` subcommands
//!
//! Each command returns the JSON status line printed on success.

pub mod fetch;
pub mod reconcile;
pub mod sync;

use chrono::{Local, NaiveDate};
use serde_json::Value;
use shiftsync_domain::Result;

use crate::args::Command;
use crate::context::AppContext;

/// Run one subcommand to completion.
///
/// # Errors
/// The fatal error that ended the run.
pub async fn dispatch(ctx: AppContext, command: &Command) -> Result<Value> {
    match command {
        Command::Sync(args) => sync::run(ctx, args).await,
        Command::Fetch(args) => fetch::run(ctx, args).await,
        Command::Reconcile(args) => reconcile::run(&ctx, args).await,
    }
}

/// The date a run is keyed by when none is given.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}
