use serde_json::{json, Value};
use shiftsync_core::fetch_only;
use shiftsync_domain::{Result, SyncWindow};
use tracing::info;

use super::today;
use crate::args::ScrapeArgs;
use crate::context::AppContext;

/// Log in, fetch and persist the week's schedule without touching the
/// calendar.
///
/// # Errors
/// Credential, login, fetch and storage failures.
pub async fn run(ctx: AppContext, args: &ScrapeArgs) -> Result<Value> {
    let run_date = args.date.unwrap_or_else(today);
    let window = SyncWindow::week_of(run_date);
    let ctx = ctx.with_schedule_dir(args.schedule_dir.clone());
    let credentials =
        ctx.credential_provider(args.credentials.as_deref(), args.credential_overrides());

    info!(%run_date, week_start = %window.floor(), "Fetching schedule");
    let loader = ctx.schedule_loader(credentials, args.headful)?;
    let loaded = fetch_only(&loader, run_date, window).await?;

    Ok(json!({
        "status": "success",
        "path": loaded.location,
        "shifts_count": loaded.schedule.len(),
    }))
}
