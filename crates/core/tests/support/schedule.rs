use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use shiftsync_core::{CredentialProvider, ScheduleFetcher, ScheduleStore, SessionBridge};
use shiftsync_domain::{Credentials, Result as DomainResult, Schedule, Session, ShiftSyncError};

/// Raw portal record for a shift.
pub fn shift_record(id: u64, start: &str, end: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "employeeId": "E-77",
        "jobClass": "SERVER",
        "startDateTime": start,
        "endDateTime": end,
        "dayOfWeek": "MONDAY",
        "state": "PUBLISHED"
    })
}

/// Credentials provider that counts how often it is asked.
#[derive(Default)]
pub struct CountingCredentials {
    pub calls: AtomicUsize,
}

#[async_trait]
impl CredentialProvider for CountingCredentials {
    async fn credentials(&self) -> DomainResult<Credentials> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Credentials::new("crew-member", "secret"))
    }
}

/// What a [`ScriptedBridge`] does when asked to log in.
pub enum BridgeScript {
    Succeed,
    Fail(ShiftSyncError),
    Stall,
}

pub struct ScriptedBridge {
    script: BridgeScript,
    pub calls: AtomicUsize,
}

impl ScriptedBridge {
    pub fn new(script: BridgeScript) -> Self {
        Self { script, calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl SessionBridge for ScriptedBridge {
    async fn login(&self, _credentials: &Credentials, _timeout: Duration) -> DomainResult<Session> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            BridgeScript::Succeed => Ok([
                ("Rest".to_string(), "1234".to_string()),
                ("EmpID".to_string(), "E-77".to_string()),
                ("SMSESSION".to_string(), "token".to_string()),
            ]
            .into_iter()
            .collect()),
            BridgeScript::Fail(err) => Err(err.clone()),
            BridgeScript::Stall => std::future::pending().await,
        }
    }
}

/// Fetcher returning a fixed result and recording the requested week.
pub struct ScriptedFetcher {
    result: DomainResult<Schedule>,
    pub weeks: Mutex<Vec<NaiveDate>>,
}

impl ScriptedFetcher {
    pub fn returning(schedule: Schedule) -> Self {
        Self { result: Ok(schedule), weeks: Mutex::new(Vec::new()) }
    }

    pub fn failing(err: ShiftSyncError) -> Self {
        Self { result: Err(err), weeks: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.weeks.lock().unwrap().len()
    }
}

#[async_trait]
impl ScheduleFetcher for ScriptedFetcher {
    async fn fetch(&self, session: &Session, week_start: NaiveDate) -> DomainResult<Schedule> {
        assert!(session.restaurant_id().is_some(), "fetch called without a usable session");
        self.weeks.lock().unwrap().push(week_start);
        self.result.clone()
    }
}

/// Map-backed schedule store.
#[derive(Default, Clone)]
pub struct MemoryStore {
    artifacts: Arc<Mutex<HashMap<NaiveDate, Schedule>>>,
}

impl MemoryStore {
    pub fn with_artifact(self, key: NaiveDate, schedule: Schedule) -> Self {
        self.artifacts.lock().unwrap().insert(key, schedule);
        self
    }

    pub fn get(&self, key: NaiveDate) -> Option<Schedule> {
        self.artifacts.lock().unwrap().get(&key).cloned()
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn load(&self, key: NaiveDate) -> DomainResult<Option<Schedule>> {
        Ok(self.get(key))
    }

    async fn save(&self, key: NaiveDate, schedule: &Schedule) -> DomainResult<()> {
        self.artifacts.lock().unwrap().insert(key, schedule.clone());
        Ok(())
    }

    fn locate(&self, key: NaiveDate) -> String {
        format!("memory://{key}")
    }
}
