//! External service integrations

pub mod calendar;
pub mod portal;
