//! Domain types and models

pub mod event;
pub mod session;
pub mod shift;
pub mod window;

pub use event::{CalendarSummary, EventQuery, EventTemplate, ManagedEvent, Page, RemoteEvent};
pub use session::{Credentials, Session};
pub use shift::{parse_local_datetime, Schedule, ScheduleFormatError, Shift};
pub use window::SyncWindow;
