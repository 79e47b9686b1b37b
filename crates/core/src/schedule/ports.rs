//! Port interfaces for retrieving and persisting schedules

use async_trait::async_trait;
use chrono::NaiveDate;
use shiftsync_domain::{Result, Schedule, Session};

/// Retrieves the raw shift list for one week from the portal.
#[async_trait]
pub trait ScheduleFetcher: Send + Sync {
    /// Fetch shifts for the week starting at `week_start`.
    ///
    /// Exactly one network attempt is made per call.
    ///
    /// # Errors
    /// `Fetch` when the session lacks identifiers, the request fails, the
    /// status is not a success, or the body is not an array of objects.
    async fn fetch(&self, session: &Session, week_start: NaiveDate) -> Result<Schedule>;
}

/// Durable storage of fetched schedules keyed by run date
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Load the artifact for `key`, or `None` when nothing was stored.
    ///
    /// # Errors
    /// `Storage` when an artifact exists but cannot be read or parsed.
    async fn load(&self, key: NaiveDate) -> Result<Option<Schedule>>;

    /// Persist `schedule` under `key`, replacing any previous artifact.
    ///
    /// # Errors
    /// `Storage` when the artifact cannot be written durably.
    async fn save(&self, key: NaiveDate, schedule: &Schedule) -> Result<()>;

    /// Human-readable location of the artifact for `key`.
    fn locate(&self, key: NaiveDate) -> String;
}
