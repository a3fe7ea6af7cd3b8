// ABOUTME: Wall-clock abstraction resolving instants to the user's local calendar day
// ABOUTME: System clock for production and a manually driven clock for hosts and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Clock sources for date-rollover decisions.
//!
//! Quota rollover compares calendar days in the user's timezone, so a clock
//! exposes both the UTC instant and the local day.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Offset, Utc};
use std::sync::{Mutex, PoisonError};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in the user's timezone
    fn today(&self) -> NaiveDate;
}

/// Device wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    /// Clock using the host's local timezone
    #[must_use]
    pub const fn local() -> Self {
        Self { offset: None }
    }

    /// Clock using a fixed UTC offset, for users whose timezone differs from the host
    #[must_use]
    pub const fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    instant: Mutex<DateTime<Utc>>,
    offset: FixedOffset,
}

impl ManualClock {
    /// Start at `instant`, resolving days in UTC
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self::with_offset(instant, Utc.fix())
    }

    /// Start at `instant`, resolving days with `offset`
    #[must_use]
    pub fn with_offset(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            instant: Mutex::new(instant),
            offset,
        }
    }

    /// Start at noon UTC of `day`
    #[must_use]
    pub fn at_noon(day: NaiveDate) -> Self {
        let noon = day.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc();
        Self::new(noon)
    }

    /// Jump to `instant`
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Move forward by `delta`
    pub fn advance(&self, delta: Duration) {
        let mut guard = self.instant.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += delta;
    }

    /// Move forward by whole days
    pub fn advance_days(&self, days: i64) {
        self.advance(Duration::days(days));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.offset).date_naive()
    }
}
