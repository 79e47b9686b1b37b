//! Load-or-fetch cache over a [`ScheduleStore`]

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use shiftsync_domain::{Result, Schedule};
use tracing::{debug, info, instrument};

use super::ports::ScheduleStore;

/// Where a schedule for this run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleSource {
    /// Reused from an artifact persisted earlier the same day.
    Cached,
    /// Freshly fetched from the portal and persisted.
    Fetched,
}

/// A schedule plus how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSchedule {
    pub schedule: Schedule,
    pub source: ScheduleSource,
    /// Location of the persisted artifact.
    pub location: String,
}

/// Idempotent per-day schedule cache.
///
/// At most one fetch (and therefore one portal login) happens per key.
#[derive(Clone)]
pub struct ScheduleCache {
    store: Arc<dyn ScheduleStore>,
}

impl ScheduleCache {
    pub fn new(store: Arc<dyn ScheduleStore>) -> Self {
        Self { store }
    }

    /// Return the stored artifact for `key`, or run `fetch` and persist its
    /// result before returning it.
    ///
    /// `fetch` is never invoked on a hit.
    ///
    /// # Errors
    /// `Storage` from the store, or whatever `fetch` returns. A failed fetch
    /// persists nothing.
    #[instrument(skip(self, fetch))]
    pub async fn load_or_fetch<F, Fut>(&self, key: NaiveDate, fetch: F) -> Result<LoadedSchedule>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Schedule>>,
    {
        let location = self.store.locate(key);

        if let Some(schedule) = self.store.load(key).await? {
            info!(
                %location,
                shifts = schedule.len(),
                "Using stored schedule, skipping portal login"
            );
            return Ok(LoadedSchedule { schedule, source: ScheduleSource::Cached, location });
        }

        debug!(%location, "No stored schedule, fetching from portal");
        let schedule = fetch().await?;
        self.store.save(key, &schedule).await?;
        info!(%location, shifts = schedule.len(), "Stored fetched schedule");

        Ok(LoadedSchedule { schedule, source: ScheduleSource::Fetched, location })
    }
}
