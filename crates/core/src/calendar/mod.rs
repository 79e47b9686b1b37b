//! Calendar reconciliation

pub mod ports;
pub mod reconciler;

pub use ports::CalendarService;
pub use reconciler::{CalendarReconciler, ReconcileReport, ReconcileStage};
