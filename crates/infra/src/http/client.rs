use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use shiftsync_domain::ShiftSyncError;
use tracing::debug;

use crate::errors::{status_error, IntoShiftSyncError, Surface};

/// Longest response-body excerpt carried into an error message.
const ERROR_BODY_LIMIT: usize = 512;

/// HTTP client bound to one adapter surface.
///
/// Every call is a single attempt; there is no retry at this layer.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    surface: Surface,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder(surface: Surface) -> HttpClientBuilder {
        HttpClientBuilder::new(surface)
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request once, returning the response whatever its status.
    ///
    /// # Errors
    /// Transport failures and timeouts, mapped onto this client's surface.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ShiftSyncError> {
        let request = builder.build().map_err(|err| err.into_shiftsync(self.surface))?;
        let method = request.method().clone();
        let url = redacted_url(request.url());
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(err.into_shiftsync(self.surface))
            }
        }
    }

    /// Execute the request once and require a success status.
    ///
    /// # Errors
    /// As [`HttpClient::send`], plus a status error carrying a body excerpt
    /// for non-2xx responses.
    pub async fn send_checked(&self, builder: RequestBuilder) -> Result<Response, ShiftSyncError> {
        let response = self.send(builder).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        let detail = match status.canonical_reason() {
            Some(reason) if excerpt.is_empty() => reason.to_string(),
            Some(reason) => format!("{reason}: {excerpt}"),
            None => excerpt,
        };
        Err(status_error(self.surface, status.as_u16(), &detail))
    }
}

/// URL without its query string, for log lines.
fn redacted_url(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    surface: Surface,
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl HttpClientBuilder {
    fn new(surface: Surface) -> Self {
        Self { surface, timeout: Duration::from_secs(30), user_agent: None, default_headers: None }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// # Errors
    /// `Internal` when the TLS backend cannot be initialised.
    pub fn build(self) -> Result<HttpClient, ShiftSyncError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| {
            ShiftSyncError::Internal(format!("failed to build HTTP client: {err}"))
        })?;

        Ok(HttpClient { client, surface: self.surface })
    }
}
