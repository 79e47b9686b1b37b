use shiftsync_domain::ShiftSyncError;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `verbose`.
/// Logs always go to stderr so stdout carries only the status line.
pub fn init_tracing(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json {
        registry.with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr)).try_init()
    } else {
        registry.with(fmt::layer().compact().with_writer(std::io::stderr)).try_init()
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Convert a `ShiftSyncError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &ShiftSyncError) -> &'static str {
    match error {
        ShiftSyncError::Config(_) => "config",
        ShiftSyncError::LoginTimeout(_) => "login_timeout",
        ShiftSyncError::LoginEnvironment(_) => "login_environment",
        ShiftSyncError::Login(_) => "login",
        ShiftSyncError::Fetch(_) => "fetch",
        ShiftSyncError::CalendarNotFound(_) => "calendar_not_found",
        ShiftSyncError::Calendar(_) => "calendar",
        ShiftSyncError::PartialRecord(_) => "partial_record",
        ShiftSyncError::Auth(_) => "auth",
        ShiftSyncError::Storage(_) => "storage",
        ShiftSyncError::Internal(_) => "internal",
    }
}

/// Process exit code for a failed run: 2 for configuration problems, 1 for
/// anything else.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<ShiftSyncError>() {
        Some(ShiftSyncError::Config(_)) => 2,
        _ => 1,
    }
}
