//! Conversions from external infrastructure errors into domain errors.
//!
//! The same transport failure means different things depending on which
//! adapter hit it (a portal 401 is a failed fetch, a calendar 401 is an
//! authorization problem), so conversions take the [`Surface`] they happened
//! on.

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use shiftsync_domain::ShiftSyncError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ShiftSyncError);

impl From<InfraError> for ShiftSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ShiftSyncError> for InfraError {
    fn from(value: ShiftSyncError) -> Self {
        InfraError(value)
    }
}

/// Adapter an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Workforce portal REST calls.
    Portal,
    /// Calendar service REST calls.
    Calendar,
    /// Calendar token loading and refresh.
    Token,
    /// Schedule artifacts on disk.
    Storage,
    /// Configuration and credential files.
    Config,
}

impl Surface {
    /// Domain error for a failure on this surface.
    pub fn error(self, message: impl Into<String>) -> ShiftSyncError {
        let message = message.into();
        match self {
            Self::Portal => ShiftSyncError::Fetch(message),
            Self::Calendar => ShiftSyncError::Calendar(message),
            Self::Token => ShiftSyncError::Auth(message),
            Self::Storage => ShiftSyncError::Storage(message),
            Self::Config => ShiftSyncError::Config(message),
        }
    }
}

/// Conversion of a third-party error given the surface it occurred on.
pub trait IntoShiftSyncError {
    fn into_shiftsync(self, surface: Surface) -> ShiftSyncError;
}

/// `map_err` shorthand for [`IntoShiftSyncError`].
pub trait ResultExt<T> {
    /// # Errors
    /// The converted error when `self` is `Err`.
    fn on(self, surface: Surface) -> Result<T, ShiftSyncError>;
}

impl<T, E: IntoShiftSyncError> ResultExt<T> for Result<T, E> {
    fn on(self, surface: Surface) -> Result<T, ShiftSyncError> {
        self.map_err(|err| err.into_shiftsync(surface))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ShiftSyncError */
/* -------------------------------------------------------------------------- */

impl IntoShiftSyncError for HttpError {
    fn into_shiftsync(self, surface: Surface) -> ShiftSyncError {
        if self.is_timeout() {
            return surface.error("HTTP request timed out");
        }

        if self.is_connect() {
            return surface.error(format!("HTTP connection failure: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return status_error(surface, code, reason);
        }

        if self.is_decode() {
            return surface.error(format!("invalid response body: {self}"));
        }

        surface.error(self.to_string())
    }
}

/// Domain error for a non-success HTTP status.
///
/// Calendar 401/403 responses mean the token is bad, which is an
/// authorization failure rather than a calendar one.
pub fn status_error(surface: Surface, code: u16, detail: &str) -> ShiftSyncError {
    let message = format!("HTTP {code} {detail}");
    match (surface, code) {
        (Surface::Calendar, 401 | 403) => ShiftSyncError::Auth(message),
        _ => surface.error(message),
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → ShiftSyncError */
/* -------------------------------------------------------------------------- */

impl IntoShiftSyncError for std::io::Error {
    fn into_shiftsync(self, surface: Surface) -> ShiftSyncError {
        surface.error(format!("I/O error ({:?}): {self}", self.kind()))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_shiftsync(Surface::Storage))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → ShiftSyncError */
/* -------------------------------------------------------------------------- */

impl IntoShiftSyncError for JsonError {
    fn into_shiftsync(self, surface: Surface) -> ShiftSyncError {
        let (line, column) = (self.line(), self.column());
        surface.error(format!("invalid JSON at line {line} column {column}: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_shiftsync(Surface::Storage))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
