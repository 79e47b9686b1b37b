//! # ShiftSync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - WebDriver session bridge and portal schedule fetcher
//! - Google Calendar adapter and access-token providers
//! - File-backed schedule store
//! - Configuration loader and credential sources
//!
//! ## Architecture
//! - Implements traits defined in `shiftsync-core`
//! - Depends on `shiftsync-domain` and `shiftsync-core`
//! - Contains all "impure" code (browser, HTTP, filesystem, environment)

pub mod config;
pub mod credentials;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod storage;

// Re-export commonly used items
pub use credentials::{CredentialOverrides, EnvCredentialProvider, FileCredentialProvider};
pub use errors::{InfraError, Surface};
pub use http::HttpClient;
pub use integrations::calendar::{
    AccessTokenProvider, AuthorizedUserTokenProvider, GoogleCalendarService, StaticTokenProvider,
};
pub use integrations::portal::{PortalScheduleFetcher, WebDriverSessionBridge};
pub use storage::FileScheduleStore;
