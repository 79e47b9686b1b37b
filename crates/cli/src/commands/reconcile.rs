use serde_json::{json, Value};
use shiftsync_core::reconcile_only;
use shiftsync_domain::{Result, SyncWindow};
use shiftsync_infra::FileScheduleStore;
use tracing::info;

use super::today;
use crate::args::ReconcileArgs;
use crate::context::AppContext;

/// Reconcile the calendar against a stored schedule artifact.
///
/// # Errors
/// `Storage` for an unreadable artifact, calendar resolution and listing
/// failures.
pub async fn run(ctx: &AppContext, args: &ReconcileArgs) -> Result<Value> {
    let window = SyncWindow::week_of(args.week_of.unwrap_or_else(today));
    let schedule = FileScheduleStore::read_artifact(&args.schedule).await?;
    info!(
        path = %args.schedule.display(),
        shifts = schedule.len(),
        week_start = %window.floor(),
        "Reconciling stored schedule"
    );

    let report = reconcile_only(&ctx.reconciler()?, &schedule, window).await?;

    Ok(json!({
        "status": "success",
        "created": report.created,
        "deleted": report.deleted,
    }))
}
