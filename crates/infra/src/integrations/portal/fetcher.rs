//! Shift listing over plain HTTP using a captured portal session

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use shiftsync_core::ScheduleFetcher;
use shiftsync_domain::constants::DATE_FORMAT;
use shiftsync_domain::{PortalConfig, Result, Schedule, Session, ShiftSyncError};
use tracing::{info, instrument};
use url::Url;

use crate::errors::{ResultExt, Surface};
use crate::http::HttpClient;

/// Fetches one week of shifts from the portal's REST endpoint.
///
/// Requests mimic the portal's own browser client: same user agent,
/// referer and fetch-metadata headers, plus the whole session cookie jar.
pub struct PortalScheduleFetcher {
    http: HttpClient,
    api_base: Url,
}

impl PortalScheduleFetcher {
    /// # Errors
    /// `Config` when the API base URL or a header value is invalid.
    pub fn new(config: &PortalConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base_url).map_err(|err| {
            ShiftSyncError::Config(format!(
                "portal.api_base_url '{}' is invalid: {err}",
                config.api_base_url
            ))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(ShiftSyncError::Config(format!(
                "portal.api_base_url '{}' cannot carry a path",
                config.api_base_url
            )));
        }

        let http = HttpClient::builder(Surface::Portal)
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(browser_headers(&config.referer)?)
            .build()?;

        Ok(Self { http, api_base })
    }

    /// `{api_base}/restaurants/{rest}/team-members/{emp}/shifts?shiftStartDate=…`
    fn shifts_url(&self, session: &Session, week_start: NaiveDate) -> Result<Url> {
        let restaurant = session
            .restaurant_id()
            .ok_or_else(|| ShiftSyncError::Fetch("session has no restaurant identifier".into()))?;
        let employee = session
            .employee_id()
            .ok_or_else(|| ShiftSyncError::Fetch("session has no employee identifier".into()))?;

        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| ShiftSyncError::Fetch("portal API base cannot carry a path".into()))?
            .pop_if_empty()
            .extend(["restaurants", restaurant, "team-members", employee, "shifts"]);
        url.query_pairs_mut()
            .append_pair("shiftStartDate", &week_start.format(DATE_FORMAT).to_string());

        Ok(url)
    }
}

#[async_trait]
impl ScheduleFetcher for PortalScheduleFetcher {
    #[instrument(skip(self, session), fields(week_start = %week_start))]
    async fn fetch(&self, session: &Session, week_start: NaiveDate) -> Result<Schedule> {
        let url = self.shifts_url(session, week_start)?;

        let request = self
            .http
            .request(Method::GET, url)
            .header(header::COOKIE, session.cookie_header());
        let response = self.http.send_checked(request).await?;
        let body = response.bytes().await.on(Surface::Portal)?;

        let schedule = Schedule::parse(&body)
            .map_err(|err| ShiftSyncError::Fetch(format!("malformed shift list: {err}")))?;
        info!(shifts = schedule.len(), "Fetched shift list");

        Ok(schedule)
    }
}

const FETCH_METADATA: [(&str, &str); 3] =
    [("sec-fetch-dest", "empty"), ("sec-fetch-mode", "cors"), ("sec-fetch-site", "same-origin")];

fn browser_headers(referer: &str) -> Result<HeaderMap> {
    let referer = HeaderValue::from_str(referer).map_err(|_| {
        ShiftSyncError::Config(format!("portal.referer '{referer}' is not a valid header"))
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::REFERER, referer);
    for (name, value) in FETCH_METADATA {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    Ok(headers)
}
