//! Access tokens for the calendar service

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use shiftsync_domain::{Result, ShiftSyncError};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::errors::{ResultExt, Surface};
use crate::http::HttpClient;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Supplies bearer tokens for calendar requests.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// # Errors
    /// `Auth` when no usable token can be produced.
    async fn access_token(&self) -> Result<String>;
}

/// Fixed token, typically from `SHIFTSYNC_CALENDAR_ACCESS_TOKEN`.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Authorized-user credentials as written by Google's client libraries
#[derive(Debug, Clone, Deserialize)]
struct AuthorizedUser {
    #[serde(default)]
    token: Option<String>,
    refresh_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
    #[serde(default)]
    expiry: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - chrono::Duration::seconds(EXPIRY_MARGIN_SECS) > now,
            None => true,
        }
    }
}

/// Token provider backed by an authorized-user `token.json`.
///
/// The stored access token is reused while unexpired; otherwise one
/// refresh-token grant is made and the result cached for the rest of the run.
/// The file itself is never rewritten.
pub struct AuthorizedUserTokenProvider {
    path: PathBuf,
    http: HttpClient,
    cached: Mutex<Option<CachedToken>>,
}

impl AuthorizedUserTokenProvider {
    /// # Errors
    /// `Internal` when the HTTP client cannot be built.
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder(Surface::Token).timeout(timeout).build()?;
        Ok(Self { path: path.into(), http, cached: Mutex::new(None) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<AuthorizedUser> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|err| {
            ShiftSyncError::Auth(format!("cannot read token file {}: {err}", self.path.display()))
        })?;
        serde_json::from_slice(&bytes).on(Surface::Token)
    }

    #[instrument(skip(self, user), fields(path = %self.path.display()))]
    async fn refresh(&self, user: &AuthorizedUser) -> Result<CachedToken> {
        let (Some(refresh_token), Some(client_id), Some(client_secret)) =
            (&user.refresh_token, &user.client_id, &user.client_secret)
        else {
            return Err(ShiftSyncError::Auth(
                "token expired and token file lacks refresh_token/client_id/client_secret".into(),
            ));
        };
        let token_uri = user.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);

        let request = self.http.request(Method::POST, token_uri).form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
        ]);
        let response: RefreshResponse =
            self.http.send_checked(request).await?.json().await.on(Surface::Token)?;

        info!(expires_in = ?response.expires_in, "Refreshed calendar access token");
        Ok(CachedToken {
            value: response.access_token,
            expires_at: response
                .expires_in
                .map(|secs| Utc::now() + chrono::Duration::seconds(secs)),
        })
    }
}

#[async_trait]
impl AccessTokenProvider for AuthorizedUserTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let user = self.load().await?;
        let stored = user.token.clone().filter(|t| !t.is_empty()).map(|value| CachedToken {
            value,
            expires_at: user.expiry.as_deref().and_then(parse_expiry),
        });

        let token = match stored {
            Some(token) if token.is_fresh(now) => {
                debug!("Using stored calendar access token");
                token
            }
            _ => self.refresh(&user).await?,
        };

        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}

/// Expiry timestamps are UTC, with or without an explicit offset.
fn parse_expiry(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
