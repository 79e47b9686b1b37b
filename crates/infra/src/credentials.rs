//! Portal credential sources
//!
//! A JSON file (`{"username": "...", "password": "..."}`) passed with
//! `--credentials`, or the `SHIFTSYNC_PORTAL_USERNAME` /
//! `SHIFTSYNC_PORTAL_PASSWORD` environment variables. Values given on the
//! command line replace the matching field from either source.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use shiftsync_core::CredentialProvider;
use shiftsync_domain::{Credentials, Result, ShiftSyncError};
use tracing::debug;

pub const USERNAME_ENV: &str = "SHIFTSYNC_PORTAL_USERNAME";
pub const PASSWORD_ENV: &str = "SHIFTSYNC_PORTAL_PASSWORD";

#[derive(Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Per-field values that win over whatever the underlying source holds.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialOverrides {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialOverrides {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    /// Both fields supplied, so the underlying source need not be read.
    fn complete(&self) -> Option<(String, String)> {
        Some((self.username.clone()?, self.password.clone()?))
    }

    fn apply(&self, username: String, password: String) -> (String, String) {
        (self.username.clone().unwrap_or(username), self.password.clone().unwrap_or(password))
    }
}

impl fmt::Debug for CredentialOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialOverrides")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Credentials read from a JSON file when first requested.
#[derive(Debug, Clone)]
pub struct FileCredentialProvider {
    path: PathBuf,
    overrides: CredentialOverrides,
}

impl FileCredentialProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), overrides: CredentialOverrides::default() }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: CredentialOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    async fn credentials(&self) -> Result<Credentials> {
        let raw = tokio::fs::read(&self.path).await.map_err(|err| {
            ShiftSyncError::Config(format!(
                "cannot read credentials file {}: {err}",
                self.path.display()
            ))
        })?;
        let file: CredentialsFile = serde_json::from_slice(&raw).map_err(|err| {
            ShiftSyncError::Config(format!(
                "invalid credentials file {}: {err}",
                self.path.display()
            ))
        })?;

        debug!(path = %self.path.display(), "Loaded portal credentials from file");
        let (username, password) = self.overrides.apply(file.username, file.password);
        require(username, password, &self.path.display().to_string())
    }
}

/// Credentials taken from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialProvider {
    overrides: CredentialOverrides,
}

impl EnvCredentialProvider {
    pub fn new(overrides: CredentialOverrides) -> Self {
        Self { overrides }
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn credentials(&self) -> Result<Credentials> {
        if let Some((username, password)) = self.overrides.complete() {
            debug!("Using portal credentials from the command line");
            return require(username, password, "the command line");
        }

        let username = std::env::var(USERNAME_ENV).unwrap_or_default();
        let password = std::env::var(PASSWORD_ENV).unwrap_or_default();
        let (username, password) = self.overrides.apply(username, password);
        require(username, password, "the environment")
    }
}

fn require(username: String, password: String, source: &str) -> Result<Credentials> {
    if username.trim().is_empty() {
        return Err(ShiftSyncError::Config(format!("portal username missing from {source}")));
    }
    if password.is_empty() {
        return Err(ShiftSyncError::Config(format!("portal password missing from {source}")));
    }
    Ok(Credentials::new(username.trim(), password))
}
