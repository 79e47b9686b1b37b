//! Shift records as returned by the portal's listing endpoint

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::constants::LOCAL_DATETIME_FORMAT;
use crate::errors::{Result, ShiftSyncError};

/// One scheduled work period.
///
/// Every field is optional on the wire. Identifier-like fields accept JSON
/// strings or numbers; a timestamp that is present but unparseable is read as
/// absent so the record is skipped rather than guessed at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shift {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub employee_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub job_class: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(rename = "startDateTime", deserialize_with = "lenient_datetime")]
    pub start: Option<NaiveDateTime>,
    #[serde(rename = "endDateTime", deserialize_with = "lenient_datetime")]
    pub end: Option<NaiveDateTime>,
    #[serde(deserialize_with = "lenient_string")]
    pub day_of_week: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub comment: Option<String>,
}

impl Shift {
    /// Start and end of the shift, or `PartialRecord` when either is missing
    /// or the pair is not ordered.
    pub fn window(&self) -> Result<(NaiveDateTime, NaiveDateTime)> {
        let label = self.label();
        let start = self
            .start
            .ok_or_else(|| ShiftSyncError::PartialRecord(format!("shift {label}: missing start")))?;
        let end = self
            .end
            .ok_or_else(|| ShiftSyncError::PartialRecord(format!("shift {label}: missing end")))?;

        if start >= end {
            return Err(ShiftSyncError::PartialRecord(format!(
                "shift {label}: start {start} is not before end {end}"
            )));
        }

        Ok((start, end))
    }

    /// Identifier used in log lines; falls back to `<unknown>`.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<unknown>")
    }
}

/// Problems with the shape of a raw schedule document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleFormatError {
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("expected a JSON array of shifts")]
    NotArray,
    #[error("element {index} is not a JSON object")]
    NotObject { index: usize },
}

/// The raw shift array exactly as the listing endpoint returned it.
///
/// Persisted verbatim by the schedule store; [`Schedule::shifts`] gives the
/// typed view consumed by the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    records: Vec<Value>,
}

impl Schedule {
    pub fn from_records(records: Vec<Value>) -> Self {
        Self { records }
    }

    /// Parse and shape-check a JSON document.
    pub fn parse(bytes: &[u8]) -> std::result::Result<Self, ScheduleFormatError> {
        let document: Value =
            serde_json::from_slice(bytes).map_err(|e| ScheduleFormatError::Json(e.to_string()))?;
        Self::from_document(document)
    }

    /// Shape-check an already decoded JSON document.
    pub fn from_document(document: Value) -> std::result::Result<Self, ScheduleFormatError> {
        let Value::Array(records) = document else {
            return Err(ScheduleFormatError::NotArray);
        };

        if let Some(index) = records.iter().position(|record| !record.is_object()) {
            return Err(ScheduleFormatError::NotObject { index });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Typed shifts in response order.
    ///
    /// A record that cannot be read at all becomes an empty shift, which the
    /// reconciler then skips as a partial record.
    pub fn shifts(&self) -> Vec<Shift> {
        self.records.iter().map(|record| Shift::deserialize(record).unwrap_or_default()).collect()
    }

    /// Pretty-printed JSON array, as written to disk.
    pub fn to_json_pretty(&self) -> std::result::Result<Vec<u8>, ScheduleFormatError> {
        serde_json::to_vec_pretty(&self.records)
            .map_err(|e| ScheduleFormatError::Json(e.to_string()))
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_datetime<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => parse_local_datetime(&s),
        _ => None,
    })
}

/// Parse a portal timestamp into local wall-clock time.
///
/// Zone-less values are taken as-is; values carrying an offset keep their
/// local reading and drop the offset.
pub fn parse_local_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDateTime::parse_from_str(trimmed, LOCAL_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(trimmed).ok().map(|dt| dt.naive_local()))
}
