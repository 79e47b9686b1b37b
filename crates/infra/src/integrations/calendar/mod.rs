//! Calendar service integration (Google Calendar v3)

pub mod auth;
pub mod google;
mod types;

pub use auth::{AccessTokenProvider, AuthorizedUserTokenProvider, StaticTokenProvider};
pub use google::GoogleCalendarService;
