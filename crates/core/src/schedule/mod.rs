//! Schedule retrieval and storage

pub mod cache;
pub mod ports;

pub use cache::{LoadedSchedule, ScheduleCache, ScheduleSource};
pub use ports::{ScheduleFetcher, ScheduleStore};
