//! Calendar-day and instant source.
//!
//! Every "today" in the tracker is the device's local calendar day, never UTC,
//! so a log entry made late in the evening lands on the day the user lived it.

use chrono::{Days, Local, NaiveDate};
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock {
    /// Local calendar day.
    fn today(&self) -> NaiveDate;
    /// Unix milliseconds.
    fn now_millis(&self) -> u64;
}

/// Wall clock in the device's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Clock pinned to a given day and instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub now_millis: u64,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            now_millis: 0,
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_millis(&self) -> u64 {
        self.now_millis
    }
}

/// The calendar day before `date`. Saturates at the earliest representable day.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}
