//! Portal session acquisition

pub mod ports;

use std::time::Duration;

use shiftsync_domain::{Credentials, Result, Session, ShiftSyncError};
use tracing::{info, instrument, warn};

pub use ports::{CredentialProvider, SessionBridge};

/// Slack added on top of the bridge's own waits before the hard deadline fires.
pub const LOGIN_DEADLINE_GRACE: Duration = Duration::from_secs(15);

/// Hard deadline for a whole login given the per-wait `timeout`.
///
/// A bridge waits up to `timeout` for the form and again for the post-login
/// page. Driver startup and settling must fit in [`LOGIN_DEADLINE_GRACE`].
pub fn login_deadline(timeout: Duration) -> Duration {
    timeout.saturating_mul(2).saturating_add(LOGIN_DEADLINE_GRACE)
}

/// Run `bridge.login` under a hard deadline so a wedged browser can never
/// hang the run.
///
/// # Errors
/// Whatever the bridge returns, or `LoginTimeout` when the deadline elapses
/// first. Dropping the in-flight login future releases the bridge's
/// resources.
#[instrument(skip(bridge, credentials), fields(user = %credentials.username))]
pub async fn login_with_deadline(
    bridge: &dyn SessionBridge,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<Session> {
    let deadline = login_deadline(timeout);

    match tokio::time::timeout(deadline, bridge.login(credentials, timeout)).await {
        Ok(Ok(session)) => {
            info!(cookies = session.len(), "Portal login succeeded");
            Ok(session)
        }
        Ok(Err(err)) => Err(err),
        Err(_) => {
            warn!(deadline_secs = deadline.as_secs(), "Portal login exceeded its deadline");
            Err(ShiftSyncError::LoginTimeout(format!(
                "login did not finish within {}s",
                deadline.as_secs()
            )))
        }
    }
}
