//! Shared test helpers for `shiftsync-core` integration tests.
//!
//! In-memory fakes for every core port so pipeline and reconciler tests can
//! focus on behaviour instead of I/O.

#![allow(dead_code)]

pub mod calendar;
pub mod schedule;

use chrono::{NaiveDate, NaiveDateTime};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}
