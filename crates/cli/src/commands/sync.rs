use serde_json::{json, Value};
use shiftsync_domain::{Result, SyncWindow};
use tracing::info;

use super::today;
use crate::args::ScrapeArgs;
use crate::context::AppContext;

/// Full pipeline: stored-or-fetched schedule, then calendar reconciliation.
///
/// # Errors
/// Any fatal pipeline error.
pub async fn run(ctx: AppContext, args: &ScrapeArgs) -> Result<Value> {
    let run_date = args.date.unwrap_or_else(today);
    let window = SyncWindow::week_of(run_date);
    let ctx = ctx.with_schedule_dir(args.schedule_dir.clone());
    let credentials =
        ctx.credential_provider(args.credentials.as_deref(), args.credential_overrides());

    info!(%run_date, week_start = %window.floor(), "Starting sync");
    let pipeline = ctx.pipeline(credentials, args.headful)?;
    let report = pipeline.run(run_date, window).await?;

    Ok(json!({
        "status": "success",
        "source": report.schedule_source,
        "shifts_count": report.shift_count,
        "created": report.reconcile.created,
        "deleted": report.reconcile.deleted,
        "skipped": report.reconcile.skipped,
        "create_failures": report.reconcile.create_failures,
        "delete_failures": report.reconcile.delete_failures,
    }))
}
