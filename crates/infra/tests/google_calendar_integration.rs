//! Integration tests for the Google Calendar adapter
//!
//! **Coverage:**
//! - Calendar list and event list pagination through `nextPageToken`
//! - Event query parameters in the template's zone and bearer authorization
//! - Unreadable listing items are skipped, not fatal
//! - Insert body shape (zone-less local times plus `timeZone`)
//! - Delete status handling (204, 410, 5xx)
//! - A full reconcile pass against the mocked REST surface

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use shiftsync_core::{CalendarReconciler, CalendarService, ReconcileStage};
use shiftsync_domain::{
    CalendarConfig, EventQuery, EventTemplate, ManagedEvent, Schedule, ShiftSyncError, SyncWindow,
};
use shiftsync_infra::{GoogleCalendarService, StaticTokenProvider};
use wiremock::matchers::{
    body_partial_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "ya29.test-token";

fn service(server: &MockServer) -> GoogleCalendarService {
    let config = CalendarConfig { api_base_url: server.uri(), ..CalendarConfig::default() };
    GoogleCalendarService::new(&config, Arc::new(StaticTokenProvider::new(TOKEN))).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn lists_calendars_page_by_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/calendarList"))
        .and(query_param_is_missing("pageToken"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "primary", "summary": "me@example.com"}],
            "nextPageToken": "p2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me/calendarList"))
        .and(query_param("pageToken", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "og@group.calendar.google.com", "summary": "OG"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let calendar = service(&server);
    let first = calendar.list_calendars(None).await.unwrap();
    let second = calendar.list_calendars(first.next_page_token.as_deref()).await.unwrap();

    assert_eq!(first.items[0].id, "primary");
    assert_eq!(first.next_page_token.as_deref(), Some("p2"));
    assert_eq!(second.items[0].summary.as_deref(), Some("OG"));
    assert_eq!(second.next_page_token, None);
}

#[tokio::test]
async fn event_listing_sends_search_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendars/og@group.calendar.google.com/events"))
        .and(query_param("q", "OG"))
        .and(query_param("timeMin", "2025-06-02T00:00:00-07:00"))
        .and(query_param("timeZone", "America/Los_Angeles"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "e1", "summary": "OG", "start": {"dateTime": "2025-06-03T09:00:00-07:00"}},
                {"id": "e2", "summary": "OG", "start": {"date": "2025-06-04"}},
                {"id": "e3"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let window = SyncWindow::week_of(date(2025, 6, 4));
    let query = EventQuery::for_window(&EventTemplate::default(), window);
    let page =
        service(&server).list_events("og@group.calendar.google.com", &query, None).await.unwrap();

    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[0].start, date(2025, 6, 3).and_hms_opt(9, 0, 0));
    assert_eq!(page.items[1].start, date(2025, 6, 4).and_hms_opt(0, 0, 0));
    assert_eq!(page.items[2].summary, None);
    assert_eq!(page.items[2].start, None);
}

#[tokio::test]
async fn insert_posts_local_times_with_zone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendars/cal-1/events"))
        .and(body_partial_json(json!({
            "summary": "OG",
            "start": {"dateTime": "2025-06-02T09:00:00", "timeZone": "America/Los_Angeles"},
            "end": {"dateTime": "2025-06-02T17:00:00", "timeZone": "America/Los_Angeles"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "new-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let template = EventTemplate::default();
    let event = ManagedEvent {
        id: None,
        summary: template.summary.clone(),
        location: template.location.clone(),
        description: template.description.clone(),
        start: date(2025, 6, 2).and_hms_opt(9, 0, 0).unwrap(),
        end: date(2025, 6, 2).and_hms_opt(17, 0, 0).unwrap(),
        timezone: template.timezone.clone(),
    };

    let inserted = service(&server).insert_event("cal-1", &event).await.unwrap();
    assert_eq!(inserted.id.as_deref(), Some("new-1"));
    assert_eq!(inserted.start, event.start);
}

#[tokio::test]
async fn delete_treats_gone_as_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/calendars/cal-1/events/e1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/calendars/cal-1/events/e2"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/calendars/cal-1/events/e3"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let calendar = service(&server);
    assert!(calendar.delete_event("cal-1", "e1").await.is_ok());
    assert!(calendar.delete_event("cal-1", "e2").await.is_ok());
    assert!(matches!(calendar.delete_event("cal-1", "e3").await, Err(ShiftSyncError::Calendar(_))));
}

#[tokio::test]
async fn rejected_token_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/calendarList"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_token"))
        .mount(&server)
        .await;

    let err = service(&server).list_calendars(None).await.unwrap_err();
    assert!(matches!(err, ShiftSyncError::Auth(msg) if msg.contains("401")));
}

#[tokio::test]
async fn reconcile_replaces_stale_events_over_rest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/calendarList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "cal-1", "summary": "OG"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/calendars/cal-1/events"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "old-1", "summary": "OG", "start": {"dateTime": "2025-06-03T09:00:00"}},
                {"id": "lunch", "summary": "OG lunch", "start": {"dateTime": "2025-06-03T12:00:00"}}
            ],
            "nextPageToken": "more"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/calendars/cal-1/events"))
        .and(query_param("pageToken", "more"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "old-2", "summary": "OG", "start": {"dateTime": "2025-06-05T16:00:00"}}
            ]
        })))
        .mount(&server)
        .await;
    for id in ["old-1", "old-2"] {
        Mock::given(method("DELETE"))
            .and(path(format!("/calendars/cal-1/events/{id}")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/calendars/cal-1/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    let schedule = Schedule::from_records(vec![
        json!({
            "id": 1,
            "startDateTime": "2025-06-02T09:00:00",
            "endDateTime": "2025-06-02T17:00:00"
        }),
        json!({"id": 2, "startDateTime": "2025-06-04T09:00:00"}),
    ]);
    let reconciler =
        CalendarReconciler::new(Arc::new(service(&server)), "OG", EventTemplate::default());

    let window = SyncWindow::week_of(date(2025, 6, 4));
    let report = reconciler.reconcile(&schedule.shifts(), window).await.unwrap();

    assert_eq!(report.calendar_id.as_deref(), Some("cal-1"));
    assert_eq!(report.deleted, 2);
    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 1);
}

async fn mount_single_calendar(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/me/calendarList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "cal-1", "summary": "OG"}]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn window_floor_is_midnight_in_the_template_zone() {
    let server = MockServer::start().await;
    mount_single_calendar(&server).await;
    // Only a request bounded at Tokyo midnight sees the early Monday event.
    Mock::given(method("GET"))
        .and(path("/calendars/cal-1/events"))
        .and(query_param("timeMin", "2025-06-02T00:00:00+09:00"))
        .and(query_param("timeZone", "Asia/Tokyo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "early", "summary": "OG", "start": {"dateTime": "2025-06-02T07:00:00+09:00"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/calendars/cal-1/events/early"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let template = EventTemplate { timezone: "Asia/Tokyo".into(), ..EventTemplate::default() };
    let reconciler = CalendarReconciler::new(Arc::new(service(&server)), "OG", template);

    let report = reconciler.reconcile(&[], SyncWindow::week_of(date(2025, 6, 4))).await.unwrap();

    assert_eq!(report.stale_found, 1);
    assert_eq!(report.deleted, 1);
}

#[tokio::test]
async fn event_from_before_the_floor_in_the_template_zone_is_kept() {
    let server = MockServer::start().await;
    mount_single_calendar(&server).await;
    // 01:30 Monday in New York is still Sunday evening in Los Angeles.
    Mock::given(method("GET"))
        .and(path("/calendars/cal-1/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "id": "sunday",
                    "summary": "OG",
                    "start": {"dateTime": "2025-06-02T01:30:00-04:00"}
                },
                {
                    "id": "monday",
                    "summary": "OG",
                    "start": {"dateTime": "2025-06-02T12:30:00-04:00"}
                }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/calendars/cal-1/events/monday"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/calendars/cal-1/events/sunday"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let reconciler =
        CalendarReconciler::new(Arc::new(service(&server)), "OG", EventTemplate::default());
    let report = reconciler.reconcile(&[], SyncWindow::week_of(date(2025, 6, 4))).await.unwrap();

    assert_eq!(report.deleted, 1);
}

#[tokio::test]
async fn unreadable_listing_item_is_skipped() {
    let server = MockServer::start().await;
    mount_single_calendar(&server).await;
    Mock::given(method("GET"))
        .and(path("/calendars/cal-1/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "good", "summary": "OG", "start": {"dateTime": "2025-06-03T09:00:00"}},
                {"summary": "OG", "start": {"dateTime": "2025-06-04T09:00:00"}},
                {"id": "odd", "summary": "OG", "start": "tomorrow"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/calendars/cal-1/events/good"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let reconciler =
        CalendarReconciler::new(Arc::new(service(&server)), "OG", EventTemplate::default());
    let report = reconciler.run(&[], SyncWindow::week_of(date(2025, 6, 4))).await;

    assert_eq!(report.stage, ReconcileStage::Done);
    assert_eq!(report.failure, None);
    assert_eq!(report.deleted, 1);
}
