//! Calendar service port interfaces

use async_trait::async_trait;
use shiftsync_domain::{CalendarSummary, EventQuery, ManagedEvent, Page, RemoteEvent, Result};

/// Paged access to the target calendar service.
///
/// Pagination is driven by the caller: every listing returns one page and the
/// token for the next one.
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// List one page of calendars visible to the account.
    async fn list_calendars(&self, page_token: Option<&str>) -> Result<Page<CalendarSummary>>;

    /// List one page of events in `calendar_id` matching `query`.
    async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
        page_token: Option<&str>,
    ) -> Result<Page<RemoteEvent>>;

    /// Delete a single event.
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<()>;

    /// Insert `event` and return it with its service-assigned id.
    async fn insert_event(&self, calendar_id: &str, event: &ManagedEvent) -> Result<ManagedEvent>;
}
