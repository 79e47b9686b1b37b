//! Error types used throughout the application

use thiserror::Error;

/// Main error type for ShiftSync
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShiftSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Login timed out: {0}")]
    LoginTimeout(String),

    #[error("Login environment error: {0}")]
    LoginEnvironment(String),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Schedule fetch failed: {0}")]
    Fetch(String),

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("Calendar service error: {0}")]
    Calendar(String),

    #[error("Partial shift record: {0}")]
    PartialRecord(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for ShiftSync operations
pub type Result<T> = std::result::Result<T, ShiftSyncError>;
