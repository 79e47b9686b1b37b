//! Configuration management

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CALENDAR_API_BASE, DEFAULT_CALENDAR_LABEL, DEFAULT_CHROMEDRIVER_PATH,
    DEFAULT_LOGIN_TIMEOUT_SECS, DEFAULT_LOGIN_URL, DEFAULT_PASSWORD_FIELD_ID,
    DEFAULT_PORTAL_REFERER, DEFAULT_PORTAL_USER_AGENT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SCHEDULE_DIR, DEFAULT_SETTLE_DELAY_SECS, DEFAULT_SHIFTS_API_BASE,
    DEFAULT_SUBMIT_BUTTON_ID, DEFAULT_TOKEN_PATH, DEFAULT_USERNAME_FIELD_ID, DEFAULT_WEBDRIVER_PORT,
};
use crate::errors::{Result, ShiftSyncError};
use crate::types::EventTemplate;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalConfig,
    pub browser: BrowserConfig,
    pub calendar: CalendarConfig,
    pub event: EventTemplate,
    pub storage: StorageConfig,
}

/// Workforce portal endpoints and request shaping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub login_url: String,
    pub api_base_url: String,
    pub referer: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

/// Scripted browser used by the session bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub chromedriver_path: String,
    pub webdriver_port: u16,
    pub headless: bool,
    pub login_timeout_secs: u64,
    pub settle_delay_secs: u64,
    pub username_field_id: String,
    pub password_field_id: String,
    pub submit_button_id: String,
}

/// Target calendar service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Human-readable calendar name resolved to an id at run time.
    pub label: String,
    pub api_base_url: String,
    pub token_path: PathBuf,
    pub request_timeout_secs: u64,
}

/// Schedule artifact storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub schedule_dir: PathBuf,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_url: DEFAULT_LOGIN_URL.to_string(),
            api_base_url: DEFAULT_SHIFTS_API_BASE.to_string(),
            referer: DEFAULT_PORTAL_REFERER.to_string(),
            user_agent: DEFAULT_PORTAL_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chromedriver_path: DEFAULT_CHROMEDRIVER_PATH.to_string(),
            webdriver_port: DEFAULT_WEBDRIVER_PORT,
            headless: true,
            login_timeout_secs: DEFAULT_LOGIN_TIMEOUT_SECS,
            settle_delay_secs: DEFAULT_SETTLE_DELAY_SECS,
            username_field_id: DEFAULT_USERNAME_FIELD_ID.to_string(),
            password_field_id: DEFAULT_PASSWORD_FIELD_ID.to_string(),
            submit_button_id: DEFAULT_SUBMIT_BUTTON_ID.to_string(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_CALENDAR_LABEL.to_string(),
            api_base_url: DEFAULT_CALENDAR_API_BASE.to_string(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { schedule_dir: PathBuf::from(DEFAULT_SCHEDULE_DIR) }
    }
}

impl BrowserConfig {
    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }
}

impl PortalConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl CalendarConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Check the invariants the pipeline relies on.
    ///
    /// # Errors
    /// Returns `ShiftSyncError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        require_non_empty("calendar.label", &self.calendar.label)?;
        require_non_empty("portal.login_url", &self.portal.login_url)?;
        require_non_empty("portal.api_base_url", &self.portal.api_base_url)?;
        require_non_empty("calendar.api_base_url", &self.calendar.api_base_url)?;
        require_non_empty("browser.username_field_id", &self.browser.username_field_id)?;
        require_non_empty("browser.password_field_id", &self.browser.password_field_id)?;
        require_non_empty("browser.submit_button_id", &self.browser.submit_button_id)?;

        if self.storage.schedule_dir.as_os_str().is_empty() {
            return Err(ShiftSyncError::Config("storage.schedule_dir must not be empty".into()));
        }

        for (field, secs) in [
            ("browser.login_timeout_secs", self.browser.login_timeout_secs),
            ("portal.request_timeout_secs", self.portal.request_timeout_secs),
            ("calendar.request_timeout_secs", self.calendar.request_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ShiftSyncError::Config(format!("{field} must be greater than zero")));
            }
        }

        self.event.validate()
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShiftSyncError::Config(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.calendar.label, "OG");
        assert_eq!(config.event.timezone, "America/Los_Angeles");
        assert!(config.browser.headless);
    }

    #[test]
    fn empty_calendar_label_is_rejected() {
        let mut config = Config::default();
        config.calendar.label = "  ".into();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ShiftSyncError::Config(msg) if msg.contains("calendar.label")));
    }

    #[test]
    fn zero_login_timeout_is_rejected() {
        let mut config = Config::default();
        config.browser.login_timeout_secs = 0;

        assert!(matches!(config.validate(), Err(ShiftSyncError::Config(_))));
    }

    #[test]
    fn partial_sections_fall_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"calendar": {"label": "Work"}}"#).expect("parse config");

        assert_eq!(config.calendar.label, "Work");
        assert_eq!(config.calendar.api_base_url, DEFAULT_CALENDAR_API_BASE);
        assert_eq!(config.storage.schedule_dir, PathBuf::from(DEFAULT_SCHEDULE_DIR));
    }
}
