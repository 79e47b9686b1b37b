use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use shiftsync_core::CalendarService;
use shiftsync_domain::{
    CalendarSummary, EventQuery, ManagedEvent, Page, RemoteEvent, Result as DomainResult,
    ShiftSyncError,
};

/// Event held by [`InMemoryCalendar`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    pub id: String,
    pub calendar_id: String,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub timezone: Option<String>,
}

impl StoredEvent {
    /// Event created outside the pipeline, e.g. by hand or by an earlier run.
    pub fn foreign(id: &str, calendar_id: &str, summary: &str, start: NaiveDateTime) -> Self {
        Self {
            id: id.to_string(),
            calendar_id: calendar_id.to_string(),
            summary: Some(summary.to_string()),
            location: None,
            description: None,
            start: Some(start),
            end: Some(start + chrono::Duration::hours(1)),
            timezone: None,
        }
    }
}

/// Calls observed by the fake, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCall {
    ListCalendars(Option<String>),
    ListEvents(Option<String>),
    Delete(String),
    Insert(NaiveDateTime),
}

#[derive(Default)]
struct State {
    calendars: Vec<CalendarSummary>,
    calendar_page_size: usize,
    events: Vec<StoredEvent>,
    event_page_size: usize,
    next_id: u64,
    calls: Vec<CalendarCall>,
    failing_deletes: HashSet<String>,
    failing_insert_starts: HashSet<NaiveDateTime>,
    fail_event_listing: bool,
}

/// In-memory, paginated calendar service.
///
/// Listings are served in fixed-size pages with opaque offset tokens. The
/// event query's text is matched loosely (substring, case-insensitive) like
/// the real service's free-text search, so callers must filter exactly
/// themselves.
#[derive(Clone)]
pub struct InMemoryCalendar {
    state: Arc<Mutex<State>>,
}

impl InMemoryCalendar {
    pub fn new(calendars: &[(&str, &str)]) -> Self {
        let calendars = calendars
            .iter()
            .map(|(id, summary)| CalendarSummary {
                id: (*id).to_string(),
                summary: Some((*summary).to_string()),
            })
            .collect();
        Self {
            state: Arc::new(Mutex::new(State {
                calendars,
                calendar_page_size: 100,
                event_page_size: 250,
                ..State::default()
            })),
        }
    }

    pub fn with_calendar_page_size(self, size: usize) -> Self {
        self.state.lock().unwrap().calendar_page_size = size;
        self
    }

    pub fn with_event_page_size(self, size: usize) -> Self {
        self.state.lock().unwrap().event_page_size = size;
        self
    }

    pub fn with_event(self, event: StoredEvent) -> Self {
        self.state.lock().unwrap().events.push(event);
        self
    }

    pub fn failing_delete(self, event_id: &str) -> Self {
        self.state.lock().unwrap().failing_deletes.insert(event_id.to_string());
        self
    }

    pub fn failing_insert_at(self, start: NaiveDateTime) -> Self {
        self.state.lock().unwrap().failing_insert_starts.insert(start);
        self
    }

    pub fn failing_event_listing(self) -> Self {
        self.state.lock().unwrap().fail_event_listing = true;
        self
    }

    pub fn events(&self) -> Vec<StoredEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn events_in(&self, calendar_id: &str) -> Vec<StoredEvent> {
        self.events().into_iter().filter(|e| e.calendar_id == calendar_id).collect()
    }

    pub fn calls(&self) -> Vec<CalendarCall> {
        self.state.lock().unwrap().calls.clone()
    }
}

fn paginate<T: Clone>(items: &[T], page_size: usize, token: Option<&str>) -> Page<T> {
    let offset =
        token.and_then(|t| t.strip_prefix("offset-")).and_then(|t| t.parse().ok()).unwrap_or(0);
    let end = (offset + page_size).min(items.len());
    let page = items.get(offset..end).unwrap_or_default().to_vec();

    if end < items.len() {
        Page::with_next(page, format!("offset-{end}"))
    } else {
        Page::last(page)
    }
}

#[async_trait]
impl CalendarService for InMemoryCalendar {
    async fn list_calendars(
        &self,
        page_token: Option<&str>,
    ) -> DomainResult<Page<CalendarSummary>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(CalendarCall::ListCalendars(page_token.map(str::to_string)));
        Ok(paginate(&state.calendars, state.calendar_page_size, page_token))
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
        page_token: Option<&str>,
    ) -> DomainResult<Page<RemoteEvent>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(CalendarCall::ListEvents(page_token.map(str::to_string)));

        if state.fail_event_listing {
            return Err(ShiftSyncError::Calendar("HTTP 503 listing events".into()));
        }

        let needle = query.text.to_lowercase();
        let time_min = query.time_min.and_hms_opt(0, 0, 0).unwrap();
        let matching: Vec<RemoteEvent> = state
            .events
            .iter()
            .filter(|e| e.calendar_id == calendar_id)
            .filter(|e| e.summary.as_deref().is_some_and(|s| s.to_lowercase().contains(&needle)))
            .filter(|e| e.start.map_or(true, |start| start >= time_min))
            .map(|e| RemoteEvent { id: e.id.clone(), summary: e.summary.clone(), start: e.start })
            .collect();

        Ok(paginate(&matching, state.event_page_size, page_token))
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(CalendarCall::Delete(event_id.to_string()));

        if state.failing_deletes.contains(event_id) {
            return Err(ShiftSyncError::Calendar(format!("HTTP 500 deleting {event_id}")));
        }

        let before = state.events.len();
        state.events.retain(|e| !(e.calendar_id == calendar_id && e.id == event_id));
        if state.events.len() == before {
            return Err(ShiftSyncError::Calendar(format!("HTTP 404 deleting {event_id}")));
        }
        Ok(())
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &ManagedEvent,
    ) -> DomainResult<ManagedEvent> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(CalendarCall::Insert(event.start));

        if state.failing_insert_starts.contains(&event.start) {
            return Err(ShiftSyncError::Calendar("HTTP 400 inserting event".into()));
        }

        state.next_id += 1;
        let id = format!("evt-{}", state.next_id);
        state.events.push(StoredEvent {
            id: id.clone(),
            calendar_id: calendar_id.to_string(),
            summary: Some(event.summary.clone()),
            location: Some(event.location.clone()),
            description: Some(event.description.clone()),
            start: Some(event.start),
            end: Some(event.end),
            timezone: Some(event.timezone.clone()),
        });

        Ok(ManagedEvent { id: Some(id), ..event.clone() })
    }
}
