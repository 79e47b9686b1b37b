//! # ShiftSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the portal, storage and calendar
//! - The calendar reconciler
//! - The per-day schedule cache and the sync pipeline
//!
//! ## Architecture Principles
//! - Only depends on `shiftsync-domain`
//! - No browser, HTTP or filesystem code
//! - All external dependencies via traits

pub mod calendar;
pub mod pipeline;
pub mod schedule;
pub mod session;

pub use calendar::{CalendarReconciler, CalendarService, ReconcileReport, ReconcileStage};
pub use pipeline::{fetch_only, reconcile_only, PipelineReport, ScheduleLoader, SyncPipeline};
pub use schedule::{LoadedSchedule, ScheduleCache, ScheduleFetcher, ScheduleSource, ScheduleStore};
pub use session::{login_with_deadline, CredentialProvider, SessionBridge};
