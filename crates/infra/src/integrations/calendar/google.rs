//! Google Calendar v3 implementation of the calendar port

use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shiftsync_core::CalendarService;
use shiftsync_domain::{
    CalendarConfig, CalendarSummary, EventQuery, ManagedEvent, Page, RemoteEvent, Result,
    ShiftSyncError,
};
use tracing::{debug, instrument, warn};
use url::Url;

use super::auth::AccessTokenProvider;
use super::types::{
    start_of_day, CalendarListEntry, EventResource, InsertedEvent, ListResponse, NewEvent,
};
use crate::errors::{status_error, ResultExt, Surface};
use crate::http::HttpClient;

/// Google Calendar REST client
pub struct GoogleCalendarService {
    http: HttpClient,
    api_base: Url,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl GoogleCalendarService {
    /// # Errors
    /// `Config` when the API base URL is invalid.
    pub fn new(config: &CalendarConfig, tokens: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let api_base = Url::parse(&config.api_base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                ShiftSyncError::Config(format!(
                    "calendar.api_base_url '{}' is invalid",
                    config.api_base_url
                ))
            })?;
        let http =
            HttpClient::builder(Surface::Calendar).timeout(config.request_timeout()).build()?;

        Ok(Self { http, api_base, tokens })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| ShiftSyncError::Config("calendar API base cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn authorized(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.tokens.access_token().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let request = self.authorized(Method::GET, url).await?.query(query);
        self.http.send_checked(request).await?.json().await.on(Surface::Calendar)
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarService {
    #[instrument(skip(self))]
    async fn list_calendars(&self, page_token: Option<&str>) -> Result<Page<CalendarSummary>> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;
        let mut query = Vec::new();
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let page: ListResponse<CalendarListEntry> = self.get_json(url, &query).await?;
        debug!(
            calendars = page.items.len(),
            more = page.next_page_token.is_some(),
            "Listed calendars"
        );

        Ok(Page {
            items: page.items.into_iter().map(CalendarSummary::from).collect(),
            next_page_token: page.next_page_token,
        })
    }

    #[instrument(skip(self, query), fields(q = %query.text, time_min = %query.time_min))]
    async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
        page_token: Option<&str>,
    ) -> Result<Page<RemoteEvent>> {
        let zone = parse_zone(&query.timezone)?;
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;
        let mut params = vec![
            ("q", query.text.clone()),
            ("timeMin", start_of_day(query.time_min, zone).to_rfc3339()),
            ("timeZone", query.timezone.clone()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let page: ListResponse<Value> = self.get_json(url, &params).await?;
        let listed = page.items.len();
        let items: Vec<RemoteEvent> = page
            .items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<EventResource>(item) {
                Ok(resource) => Some(resource.into_remote(zone)),
                Err(err) => {
                    warn!(error = %err, "Skipping unreadable event in listing");
                    None
                }
            })
            .collect();
        debug!(
            events = items.len(),
            skipped = listed - items.len(),
            more = page.next_page_token.is_some(),
            "Listed events"
        );

        Ok(Page { items, next_page_token: page.next_page_token })
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<()> {
        let url = self.endpoint(&["calendars", calendar_id, "events", event_id])?;
        let response = self.http.send(self.authorized(Method::DELETE, url).await?).await?;

        if response.status() == StatusCode::GONE {
            debug!(event_id, "Event was already deleted");
            return Ok(());
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(status_error(
                Surface::Calendar,
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status"),
            ));
        }
        Ok(())
    }

    async fn insert_event(&self, calendar_id: &str, event: &ManagedEvent) -> Result<ManagedEvent> {
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;
        let request = self.authorized(Method::POST, url).await?.json(&NewEvent::from(event));

        let inserted: InsertedEvent =
            self.http.send_checked(request).await?.json().await.on(Surface::Calendar)?;
        Ok(ManagedEvent { id: Some(inserted.id), ..event.clone() })
    }
}

fn parse_zone(name: &str) -> Result<Tz> {
    let invalid = || ShiftSyncError::Config(format!("event.timezone '{name}' is not an IANA zone"));
    name.parse().map_err(|_| invalid())
}
