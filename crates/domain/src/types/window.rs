//! Sync window bounding which managed events are replaced

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// A single floor date; managed events starting on or after it are eligible
/// for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SyncWindow {
    floor: NaiveDate,
}

impl SyncWindow {
    pub fn new(floor: NaiveDate) -> Self {
        Self { floor }
    }

    /// Window starting on the Monday on or before `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let back = i64::from(date.weekday().num_days_from_monday());
        Self { floor: date - Duration::days(back) }
    }

    pub fn floor(&self) -> NaiveDate {
        self.floor
    }

    /// Midnight at the start of the floor date.
    pub fn floor_start(&self) -> NaiveDateTime {
        self.floor.and_time(NaiveTime::MIN)
    }

    pub fn contains(&self, start: NaiveDateTime) -> bool {
        start >= self.floor_start()
    }
}
