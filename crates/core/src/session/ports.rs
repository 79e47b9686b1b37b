//! Port interfaces for obtaining a portal session

use std::time::Duration;

use async_trait::async_trait;
use shiftsync_domain::{Credentials, Result, Session};

/// Turns an interactive portal login into a reusable cookie session.
#[async_trait]
pub trait SessionBridge: Send + Sync {
    /// Log in and capture the resulting cookie jar.
    ///
    /// `timeout` bounds each wait on the login page. Implementations must
    /// release every browser resource they acquired before returning,
    /// whatever the outcome.
    ///
    /// # Errors
    /// `LoginTimeout` when the login form does not appear in time,
    /// `LoginEnvironment` when the browser cannot be started, `Login` for any
    /// other failure.
    async fn login(&self, credentials: &Credentials, timeout: Duration) -> Result<Session>;
}

/// Source of portal login credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// # Errors
    /// `Config` when no credentials are available.
    async fn credentials(&self) -> Result<Credentials>;
}
