//! Google Calendar v3 wire types

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use shiftsync_domain::constants::LOCAL_DATETIME_FORMAT;
use shiftsync_domain::{parse_local_datetime, CalendarSummary, ManagedEvent, RemoteEvent};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CalendarListEntry {
    pub id: String,
    pub summary: Option<String>,
}

impl From<CalendarListEntry> for CalendarSummary {
    fn from(entry: CalendarListEntry) -> Self {
        Self { id: entry.id, summary: entry.summary }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventResource {
    pub id: String,
    pub summary: Option<String>,
    pub start: Option<EventTime>,
}

impl EventResource {
    /// Domain view with the start read as wall-clock time in `zone`.
    pub fn into_remote(self, zone: Tz) -> RemoteEvent {
        RemoteEvent {
            start: self.start.as_ref().and_then(|start| start.local_start(zone)),
            id: self.id,
            summary: self.summary,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    fn at(value: NaiveDateTime, time_zone: &str) -> Self {
        Self {
            date_time: Some(value.format(LOCAL_DATETIME_FORMAT).to_string()),
            date: None,
            time_zone: Some(time_zone.to_string()),
        }
    }

    /// Wall-clock start in `zone`; all-day events start at midnight.
    ///
    /// Offset-carrying times are converted into `zone` first, zone-less ones
    /// are taken as already local.
    pub fn local_start(&self, zone: Tz) -> Option<NaiveDateTime> {
        if let Some(date_time) = self.date_time.as_deref() {
            return match DateTime::parse_from_rfc3339(date_time) {
                Ok(instant) => Some(instant.with_timezone(&zone).naive_local()),
                Err(_) => parse_local_datetime(date_time),
            };
        }
        self.date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .map(|date| date.and_time(NaiveTime::MIN))
    }
}

/// Midnight starting `date` in `zone`, or the first instant after a DST gap.
pub(crate) fn start_of_day(date: NaiveDate, zone: Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    zone.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| zone.from_local_datetime(&(midnight + chrono::Duration::hours(1))).earliest())
        .unwrap_or_else(|| zone.from_utc_datetime(&midnight))
}

#[derive(Debug, Serialize)]
pub(crate) struct NewEvent<'a> {
    pub summary: &'a str,
    pub location: &'a str,
    pub description: &'a str,
    pub start: EventTime,
    pub end: EventTime,
}

impl<'a> From<&'a ManagedEvent> for NewEvent<'a> {
    fn from(event: &'a ManagedEvent) -> Self {
        Self {
            summary: &event.summary,
            location: &event.location,
            description: &event.description,
            start: EventTime::at(event.start, &event.timezone),
            end: EventTime::at(event.end, &event.timezone),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct InsertedEvent {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn remote(value: serde_json::Value, zone: Tz) -> RemoteEvent {
        serde_json::from_value::<EventResource>(value).unwrap().into_remote(zone)
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0)
    }

    #[test]
    fn all_day_events_start_at_midnight() {
        let event = remote(
            json!({"id": "e1", "summary": "OG", "start": {"date": "2025-06-03"}}),
            Tz::America__Los_Angeles,
        );

        assert_eq!(event.start, at(2025, 6, 3, 0, 0));
    }

    #[test]
    fn offset_date_times_in_the_same_zone_keep_wall_clock() {
        let event = remote(
            json!({
                "id": "e1",
                "start": {
                    "dateTime": "2025-06-02T09:00:00-07:00",
                    "timeZone": "America/Los_Angeles"
                }
            }),
            Tz::America__Los_Angeles,
        );

        assert_eq!(event.start, at(2025, 6, 2, 9, 0));
    }

    #[test]
    fn offset_date_times_are_converted_into_the_template_zone() {
        // 01:30 Monday in New York is 22:30 Sunday in Los Angeles.
        let event = remote(
            json!({"id": "e1", "start": {"dateTime": "2025-06-02T01:30:00-04:00"}}),
            Tz::America__Los_Angeles,
        );
        assert_eq!(event.start, at(2025, 6, 1, 22, 30));

        let event = remote(
            json!({"id": "e2", "start": {"dateTime": "2025-06-01T22:00:00Z"}}),
            Tz::Asia__Tokyo,
        );
        assert_eq!(event.start, at(2025, 6, 2, 7, 0));
    }

    #[test]
    fn zone_less_date_times_are_taken_as_local() {
        let zone_less = json!({"id": "e1", "start": {"dateTime": "2025-06-02T07:00:00"}});
        let event = remote(zone_less, Tz::Asia__Tokyo);
        assert_eq!(event.start, at(2025, 6, 2, 7, 0));
    }

    #[test]
    fn start_of_day_carries_the_zone_offset() {
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();

        assert_eq!(start_of_day(monday, Tz::Asia__Tokyo).to_rfc3339(), "2025-06-02T00:00:00+09:00");
        assert_eq!(
            start_of_day(monday, Tz::America__Los_Angeles).to_rfc3339(),
            "2025-06-02T00:00:00-07:00"
        );
    }

    #[test]
    fn start_of_day_skips_a_midnight_dst_gap() {
        // Santiago springs forward at midnight on 2024-09-08.
        let day = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
        let start = start_of_day(day, Tz::America__Santiago);

        assert_eq!(start.naive_local().date(), day);
        assert_eq!(start.naive_local().time(), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    }

    #[test]
    fn new_event_body_uses_zone_less_times() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let event = ManagedEvent {
            id: None,
            summary: "OG".into(),
            location: "Store".into(),
            description: "Shift".into(),
            start,
            end: start + chrono::Duration::hours(8),
            timezone: "America/Los_Angeles".into(),
        };

        let body = serde_json::to_value(NewEvent::from(&event)).unwrap();
        assert_eq!(
            body,
            json!({
                "summary": "OG",
                "location": "Store",
                "description": "Shift",
                "start": {"dateTime": "2025-06-02T09:00:00", "timeZone": "America/Los_Angeles"},
                "end": {"dateTime": "2025-06-02T17:00:00", "timeZone": "America/Los_Angeles"}
            })
        );
    }
}
