//! Configuration loader
//!
//! Builds the application configuration from defaults, an optional file and
//! environment overrides, then validates it.
//!
//! ## Loading Strategy
//! 1. `.env` in the working directory is loaded into the environment
//! 2. An explicit config file, else the first probed file, else defaults
//! 3. `SHIFTSYNC_*` environment variables override individual fields
//! 4. The result is validated
//!
//! ## Environment Variables
//! - `SHIFTSYNC_PORTAL_LOGIN_URL`, `SHIFTSYNC_PORTAL_API_BASE_URL`,
//!   `SHIFTSYNC_PORTAL_REQUEST_TIMEOUT_SECS`
//! - `SHIFTSYNC_BROWSER_CHROMEDRIVER_PATH`, `SHIFTSYNC_BROWSER_WEBDRIVER_PORT`,
//!   `SHIFTSYNC_BROWSER_HEADLESS`, `SHIFTSYNC_BROWSER_LOGIN_TIMEOUT_SECS`
//! - `SHIFTSYNC_CALENDAR_LABEL`, `SHIFTSYNC_CALENDAR_API_BASE_URL`,
//!   `SHIFTSYNC_CALENDAR_TOKEN_PATH`
//! - `SHIFTSYNC_EVENT_SUMMARY`, `SHIFTSYNC_EVENT_LOCATION`,
//!   `SHIFTSYNC_EVENT_DESCRIPTION`, `SHIFTSYNC_EVENT_TIMEZONE`
//! - `SHIFTSYNC_SCHEDULE_DIR`
//!
//! ## File Locations
//! Without an explicit path the loader probes, in the working directory:
//! `shiftsync.toml`, `shiftsync.json`, `config.toml`, `config.json`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use shiftsync_domain::{Config, Result, ShiftSyncError};

const PROBED_FILES: [&str; 4] = ["shiftsync.toml", "shiftsync.json", "config.toml", "config.json"];

/// Load, override and validate the configuration.
///
/// # Arguments
/// * `path` - Explicit config file. If `None`, uses [`probe_config_paths`]
///   and falls back to defaults when nothing is found.
///
/// # Errors
/// Returns `ShiftSyncError::Config` if the explicit file is missing, a file
/// cannot be parsed, an override has an invalid value, or validation fails.
pub fn load(path: Option<&Path>) -> Result<Config> {
    if let Ok(env_file) = dotenvy::dotenv() {
        tracing::debug!(path = %env_file.display(), "Loaded .env file");
    }

    let mut config = match path.map(Path::to_path_buf).or_else(probe_config_paths) {
        Some(config_path) => load_from_file(&config_path)?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file without overrides or validation
///
/// Format is detected by extension (`.json` or `.toml`); sections and fields
/// left out fall back to their defaults.
///
/// # Errors
/// Returns `ShiftSyncError::Config` if the file is missing, unreadable or
/// invalid.
pub fn load_from_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(ShiftSyncError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| ShiftSyncError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, path)
}

/// Parse configuration from string content
///
/// # Errors
/// Returns `ShiftSyncError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ShiftSyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ShiftSyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ShiftSyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing standard config file in the working directory.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    PROBED_FILES.iter().map(|name| cwd.join(name)).find(|path| path.exists())
}

/// Apply `SHIFTSYNC_*` environment overrides in place.
///
/// # Errors
/// Returns `ShiftSyncError::Config` when a numeric or boolean override cannot
/// be parsed.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    override_string("SHIFTSYNC_PORTAL_LOGIN_URL", &mut config.portal.login_url);
    override_string("SHIFTSYNC_PORTAL_API_BASE_URL", &mut config.portal.api_base_url);
    override_parsed(
        "SHIFTSYNC_PORTAL_REQUEST_TIMEOUT_SECS",
        &mut config.portal.request_timeout_secs,
    )?;

    override_string("SHIFTSYNC_BROWSER_CHROMEDRIVER_PATH", &mut config.browser.chromedriver_path);
    override_parsed("SHIFTSYNC_BROWSER_WEBDRIVER_PORT", &mut config.browser.webdriver_port)?;
    override_parsed(
        "SHIFTSYNC_BROWSER_LOGIN_TIMEOUT_SECS",
        &mut config.browser.login_timeout_secs,
    )?;
    if let Some(headless) = env_bool("SHIFTSYNC_BROWSER_HEADLESS")? {
        config.browser.headless = headless;
    }

    override_string("SHIFTSYNC_CALENDAR_LABEL", &mut config.calendar.label);
    override_string("SHIFTSYNC_CALENDAR_API_BASE_URL", &mut config.calendar.api_base_url);
    if let Some(path) = env_var("SHIFTSYNC_CALENDAR_TOKEN_PATH") {
        config.calendar.token_path = PathBuf::from(path);
    }

    override_string("SHIFTSYNC_EVENT_SUMMARY", &mut config.event.summary);
    override_string("SHIFTSYNC_EVENT_LOCATION", &mut config.event.location);
    override_string("SHIFTSYNC_EVENT_DESCRIPTION", &mut config.event.description);
    override_string("SHIFTSYNC_EVENT_TIMEZONE", &mut config.event.timezone);

    if let Some(dir) = env_var("SHIFTSYNC_SCHEDULE_DIR") {
        config.storage.schedule_dir = PathBuf::from(dir);
    }

    Ok(())
}

/// Non-empty environment variable value
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn override_string(key: &str, target: &mut String) {
    if let Some(value) = env_var(key) {
        *target = value;
    }
}

fn override_parsed<T>(key: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = env_var(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| ShiftSyncError::Config(format!("Invalid value for {key}: {e}")))?;
    }
    Ok(())
}

/// Parse a boolean environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Errors
/// Returns `ShiftSyncError::Config` for any other value.
fn env_bool(key: &str) -> Result<Option<bool>> {
    let Some(raw) = env_var(key) else {
        return Ok(None);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        other => Err(ShiftSyncError::Config(format!("Invalid boolean for {key}: {other}"))),
    }
}
