//! Calendar-side types: managed events and what the calendar service lists

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EVENT_DESCRIPTION, DEFAULT_EVENT_LOCATION, DEFAULT_EVENT_SUMMARY,
    DEFAULT_EVENT_TIMEZONE,
};
use crate::errors::{Result, ShiftSyncError};
use crate::types::{Shift, SyncWindow};

/// Fixed metadata stamped onto every managed event.
///
/// The summary doubles as the ownership tag: any event carrying it inside the
/// sync window is considered ours and may be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventTemplate {
    pub summary: String,
    pub location: String,
    pub description: String,
    /// IANA timezone name, e.g. `America/Los_Angeles`.
    pub timezone: String,
}

impl Default for EventTemplate {
    fn default() -> Self {
        Self {
            summary: DEFAULT_EVENT_SUMMARY.to_string(),
            location: DEFAULT_EVENT_LOCATION.to_string(),
            description: DEFAULT_EVENT_DESCRIPTION.to_string(),
            timezone: DEFAULT_EVENT_TIMEZONE.to_string(),
        }
    }
}

impl EventTemplate {
    /// # Errors
    /// `Config` when the summary tag is blank or the timezone is not a known
    /// IANA name.
    pub fn validate(&self) -> Result<()> {
        if self.summary.trim().is_empty() {
            return Err(ShiftSyncError::Config("event.summary must not be empty".into()));
        }
        self.timezone.parse::<Tz>().map_err(|_| {
            ShiftSyncError::Config(format!(
                "event.timezone '{}' is not an IANA zone",
                self.timezone
            ))
        })?;
        Ok(())
    }

    /// Whether an existing event carries this template's ownership tag.
    pub fn owns(&self, summary: Option<&str>) -> bool {
        summary == Some(self.summary.as_str())
    }
}

/// Event this pipeline creates for one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedEvent {
    /// Assigned by the calendar service on insert.
    pub id: Option<String>,
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub timezone: String,
}

impl ManagedEvent {
    /// Build the event for `shift`, or `PartialRecord` if the shift has no
    /// usable window.
    pub fn from_shift(template: &EventTemplate, shift: &Shift) -> Result<Self> {
        let (start, end) = shift.window()?;
        Ok(Self {
            id: None,
            summary: template.summary.clone(),
            location: template.location.clone(),
            description: template.description.clone(),
            start,
            end,
            timezone: template.timezone.clone(),
        })
    }
}

/// An existing event as reported by the calendar service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: String,
    pub summary: Option<String>,
    /// Local wall-clock start; all-day events start at midnight.
    pub start: Option<NaiveDateTime>,
}

/// A calendar visible to the authorized account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSummary {
    pub id: String,
    pub summary: Option<String>,
}

/// Filter sent with an event listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    /// Free-text filter; the service may match loosely.
    pub text: String,
    /// Earliest date of interest, starting at midnight in `timezone`.
    pub time_min: NaiveDate,
    /// IANA zone that `time_min` and listed start times are expressed in.
    pub timezone: String,
}

impl EventQuery {
    /// Tagged events from the floor of `window` on, in the template's zone.
    pub fn for_window(template: &EventTemplate, window: SyncWindow) -> Self {
        Self {
            text: template.summary.clone(),
            time_min: window.floor(),
            timezone: template.timezone.clone(),
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next_page_token: None }
    }

    pub fn with_next(items: Vec<T>, token: impl Into<String>) -> Self {
        Self { items, next_page_token: Some(token.into()) }
    }
}
