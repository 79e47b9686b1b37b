//! Calendar reconciler - replaces the managed events of a sync window
//!
//! One run walks `Idle → ResolvingCalendar → ListingStale → Deleting →
//! Creating → Done`. Only resolution and listing can move the run to
//! `Failed`; per-event delete/insert errors and malformed shifts are counted
//! and logged without aborting.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use shiftsync_domain::{
    EventQuery, EventTemplate, ManagedEvent, RemoteEvent, Result, Shift, ShiftSyncError, SyncWindow,
};
use tracing::{debug, error, info, instrument, warn};

use super::ports::CalendarService;

/// Progress of a single reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStage {
    #[default]
    Idle,
    ResolvingCalendar,
    ListingStale,
    Deleting,
    Creating,
    Done,
    Failed,
}

/// Outcome of a reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub calendar_id: Option<String>,
    pub stage: ReconcileStage,
    pub stale_found: usize,
    pub deleted: usize,
    pub delete_failures: usize,
    pub created: usize,
    pub create_failures: usize,
    /// Shifts skipped for a missing or invalid start/end.
    pub skipped: usize,
    /// Fatal error that moved the run to `Failed`.
    pub failure: Option<ShiftSyncError>,
}

impl ReconcileReport {
    fn advance(&mut self, stage: ReconcileStage) {
        debug!(from = ?self.stage, to = ?stage, "Reconcile stage transition");
        self.stage = stage;
    }

    fn fail(&mut self, err: ShiftSyncError) {
        error!(stage = ?self.stage, error = %err, "Reconciliation failed");
        self.stage = ReconcileStage::Failed;
        self.failure = Some(err);
    }

    /// Turn a failed run into its error.
    ///
    /// # Errors
    /// The fatal error recorded by the run, if any.
    pub fn into_result(mut self) -> Result<Self> {
        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

/// Makes the managed events of a calendar match a shift list.
///
/// Managed events are recognised solely by their summary tag. Every tagged
/// event starting inside the window is deleted before any new event is
/// inserted, so a rerun with the same shifts yields the same calendar.
pub struct CalendarReconciler {
    calendar: Arc<dyn CalendarService>,
    label: String,
    template: EventTemplate,
}

impl CalendarReconciler {
    /// # Arguments
    /// * `calendar` - calendar service adapter
    /// * `label` - human-readable name of the target calendar
    /// * `template` - fixed metadata for every managed event
    pub fn new(
        calendar: Arc<dyn CalendarService>,
        label: impl Into<String>,
        template: EventTemplate,
    ) -> Self {
        Self { calendar, label: label.into(), template }
    }

    /// Reconcile and return the report of a successful run.
    ///
    /// # Errors
    /// `CalendarNotFound` when the label matches no calendar, `Calendar` when
    /// resolving or listing fails.
    pub async fn reconcile(&self, shifts: &[Shift], window: SyncWindow) -> Result<ReconcileReport> {
        self.run(shifts, window).await.into_result()
    }

    /// Reconcile and return the report whatever the outcome.
    #[instrument(
        skip(self, shifts),
        fields(label = %self.label, floor = %window.floor(), shifts = shifts.len())
    )]
    pub async fn run(&self, shifts: &[Shift], window: SyncWindow) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        match self.execute(shifts, window, &mut report).await {
            Ok(()) => {
                report.advance(ReconcileStage::Done);
                info!(
                    deleted = report.deleted,
                    delete_failures = report.delete_failures,
                    created = report.created,
                    create_failures = report.create_failures,
                    skipped = report.skipped,
                    "Reconciliation complete"
                );
            }
            Err(err) => report.fail(err),
        }

        report
    }

    async fn execute(
        &self,
        shifts: &[Shift],
        window: SyncWindow,
        report: &mut ReconcileReport,
    ) -> Result<()> {
        report.advance(ReconcileStage::ResolvingCalendar);
        let calendar_id = self.resolve_calendar().await?;
        report.calendar_id = Some(calendar_id.clone());

        report.advance(ReconcileStage::ListingStale);
        let stale = self.list_stale(&calendar_id, window).await?;
        report.stale_found = stale.len();
        info!(stale = stale.len(), "Found managed events to replace");

        report.advance(ReconcileStage::Deleting);
        for event in &stale {
            match self.calendar.delete_event(&calendar_id, &event.id).await {
                Ok(()) => {
                    report.deleted += 1;
                    debug!(event_id = %event.id, "Deleted managed event");
                }
                Err(err) => {
                    report.delete_failures += 1;
                    warn!(event_id = %event.id, error = %err, "Failed to delete managed event");
                }
            }
        }

        report.advance(ReconcileStage::Creating);
        for shift in shifts {
            let event = match ManagedEvent::from_shift(&self.template, shift) {
                Ok(event) => event,
                Err(err) => {
                    report.skipped += 1;
                    warn!(shift = shift.label(), error = %err, "Skipping shift");
                    continue;
                }
            };

            match self.calendar.insert_event(&calendar_id, &event).await {
                Ok(created) => {
                    report.created += 1;
                    debug!(
                        shift = shift.label(),
                        event_id = ?created.id,
                        start = %created.start,
                        "Created managed event"
                    );
                }
                Err(err) => {
                    report.create_failures += 1;
                    warn!(shift = shift.label(), error = %err, "Failed to create managed event");
                }
            }
        }

        Ok(())
    }

    /// Find the id of the calendar whose summary equals the label, searching
    /// every page.
    async fn resolve_calendar(&self) -> Result<String> {
        let mut tokens = PageTokens::default();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.calendar.list_calendars(page_token.as_deref()).await?;

            let wanted = Some(self.label.as_str());
            if let Some(found) = page.items.into_iter().find(|c| c.summary.as_deref() == wanted) {
                info!(calendar_id = %found.id, "Resolved target calendar");
                return Ok(found.id);
            }

            match tokens.next(page.next_page_token)? {
                Some(next) => page_token = Some(next),
                None => return Err(ShiftSyncError::CalendarNotFound(self.label.clone())),
            }
        }
    }

    /// Every tagged event starting at or after the window floor, across all
    /// pages.
    async fn list_stale(&self, calendar_id: &str, window: SyncWindow) -> Result<Vec<RemoteEvent>> {
        let query = EventQuery::for_window(&self.template, window);
        let mut tokens = PageTokens::default();
        let mut page_token: Option<String> = None;
        let mut stale = Vec::new();

        loop {
            let page = self.calendar.list_events(calendar_id, &query, page_token.as_deref()).await?;

            for event in page.items {
                if !self.template.owns(event.summary.as_deref()) {
                    continue;
                }
                match event.start {
                    Some(start) if window.contains(start) => stale.push(event),
                    Some(_) => {}
                    None => warn!(
                        event_id = %event.id,
                        "Managed event has no readable start, leaving it"
                    ),
                }
            }

            match tokens.next(page.next_page_token)? {
                Some(next) => page_token = Some(next),
                None => return Ok(stale),
            }
        }
    }
}

/// Tracks continuation tokens so a service that repeats one cannot loop us
/// forever.
#[derive(Default)]
struct PageTokens {
    seen: HashSet<String>,
}

impl PageTokens {
    fn next(&mut self, token: Option<String>) -> Result<Option<String>> {
        match token {
            None => Ok(None),
            Some(token) if token.is_empty() => Ok(None),
            Some(token) => {
                if !self.seen.insert(token.clone()) {
                    return Err(ShiftSyncError::Calendar(format!(
                        "page token '{token}' was returned twice"
                    )));
                }
                Ok(Some(token))
            }
        }
    }
}
