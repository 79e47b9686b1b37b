//! End-to-end sync pipeline
//!
//! Strictly sequential: credentials, login, fetch, persist, reconcile. A
//! schedule already stored for the run date short-circuits everything up to
//! reconciliation.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use shiftsync_domain::{Result, Schedule, SyncWindow};
use tracing::{info, instrument};

use crate::calendar::{CalendarReconciler, ReconcileReport};
use crate::schedule::{LoadedSchedule, ScheduleCache, ScheduleFetcher, ScheduleSource};
use crate::session::{login_with_deadline, CredentialProvider, SessionBridge};

/// Obtains the schedule for a run, logging in only on a cache miss.
pub struct ScheduleLoader {
    credentials: Arc<dyn CredentialProvider>,
    bridge: Arc<dyn SessionBridge>,
    fetcher: Arc<dyn ScheduleFetcher>,
    cache: ScheduleCache,
    login_timeout: Duration,
}

impl ScheduleLoader {
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        bridge: Arc<dyn SessionBridge>,
        fetcher: Arc<dyn ScheduleFetcher>,
        cache: ScheduleCache,
        login_timeout: Duration,
    ) -> Self {
        Self { credentials, bridge, fetcher, cache, login_timeout }
    }

    /// Load the schedule stored for `run_date`, or log in and fetch the week
    /// starting at the window floor.
    ///
    /// # Errors
    /// `Config` for missing credentials, login errors from the bridge,
    /// `Fetch` from the fetcher, `Storage` from the store.
    pub async fn load(&self, run_date: NaiveDate, window: SyncWindow) -> Result<LoadedSchedule> {
        self.cache
            .load_or_fetch(run_date, || async {
                let credentials = self.credentials.credentials().await?;
                let bridge = self.bridge.as_ref();
                let session = login_with_deadline(bridge, &credentials, self.login_timeout).await?;
                self.fetcher.fetch(&session, window.floor()).await
            })
            .await
    }
}

/// Result of a full pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub schedule_source: ScheduleSource,
    pub shift_count: usize,
    pub reconcile: ReconcileReport,
}

/// Login, fetch, persist and reconcile in one run
pub struct SyncPipeline {
    loader: ScheduleLoader,
    reconciler: CalendarReconciler,
}

impl SyncPipeline {
    pub fn new(loader: ScheduleLoader, reconciler: CalendarReconciler) -> Self {
        Self { loader, reconciler }
    }

    /// # Errors
    /// Any fatal error from schedule loading or calendar reconciliation.
    #[instrument(skip(self), fields(floor = %window.floor()))]
    pub async fn run(&self, run_date: NaiveDate, window: SyncWindow) -> Result<PipelineReport> {
        let loaded = fetch_only(&self.loader, run_date, window).await?;
        let reconcile = reconcile_only(&self.reconciler, &loaded.schedule, window).await?;

        Ok(PipelineReport {
            schedule_source: loaded.source,
            shift_count: loaded.schedule.len(),
            reconcile,
        })
    }
}

/// Obtain and persist the schedule without touching the calendar.
///
/// # Errors
/// See [`ScheduleLoader::load`].
pub async fn fetch_only(
    loader: &ScheduleLoader,
    run_date: NaiveDate,
    window: SyncWindow,
) -> Result<LoadedSchedule> {
    let loaded = loader.load(run_date, window).await?;
    info!(
        source = ?loaded.source,
        location = %loaded.location,
        shifts = loaded.schedule.len(),
        "Schedule ready"
    );
    Ok(loaded)
}

/// Reconcile an already obtained schedule.
///
/// # Errors
/// See [`CalendarReconciler::reconcile`].
pub async fn reconcile_only(
    reconciler: &CalendarReconciler,
    schedule: &Schedule,
    window: SyncWindow,
) -> Result<ReconcileReport> {
    reconciler.reconcile(&schedule.shifts(), window).await
}
