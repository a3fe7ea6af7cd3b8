// ABOUTME: Per-user daily meal logging counter with lazy calendar-day rollover
// ABOUTME: Persisted as a versioned document and evaluated against the caller's tier limit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::Limit;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Persisted meal logging counter for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealLoggingQuota {
    /// Calendar day the count belongs to
    pub date: NaiveDate,
    /// Meals logged on `date`
    pub count: u32,
    /// Limit in force when the counter was last written
    pub limit: Limit,
}

impl MealLoggingQuota {
    /// Empty counter for a day
    #[must_use]
    pub const fn fresh(date: NaiveDate, limit: Limit) -> Self {
        Self {
            date,
            count: 0,
            limit,
        }
    }

    /// Whether the counter belongs to an earlier (or later) day than `today`
    #[must_use]
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.date != today
    }

    /// Counter to evaluate today: reset on rollover, otherwise carried with the current limit
    #[must_use]
    pub fn for_day(self, today: NaiveDate, limit: Limit) -> Self {
        if self.is_stale(today) {
            Self::fresh(today, limit)
        } else {
            Self { limit, ..self }
        }
    }

    /// Whether another meal may be logged
    #[must_use]
    pub fn has_capacity(&self) -> bool {
        match self.limit {
            Limit::Limited(max) => self.count < max,
            Limit::Unlimited => true,
        }
    }

    /// Meals left today, never negative
    #[must_use]
    pub fn remaining(&self) -> Limit {
        match self.limit {
            Limit::Limited(max) => Limit::Limited(max.saturating_sub(self.count)),
            Limit::Unlimited => Limit::Unlimited,
        }
    }

    /// Counter after logging one meal
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self {
            count: self.count.saturating_add(1),
            ..self
        }
    }
}

/// Outcome of a meal logging check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealLogStatus {
    /// Whether a meal may be logged now
    pub allowed: bool,
    /// Meals left today (`-1` when unlimited)
    pub remaining: Limit,
    /// Daily limit (`-1` when unlimited)
    pub limit: Limit,
}

impl MealLogStatus {
    /// Status for tiers without a daily cap
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            allowed: true,
            remaining: Limit::Unlimited,
            limit: Limit::Unlimited,
        }
    }

    /// Fail-safe status used when the counter cannot be read
    #[must_use]
    pub const fn denied(limit: Limit) -> Self {
        Self {
            allowed: false,
            remaining: Limit::Limited(0),
            limit,
        }
    }
}

impl From<&MealLoggingQuota> for MealLogStatus {
    fn from(quota: &MealLoggingQuota) -> Self {
        Self {
            allowed: quota.has_capacity(),
            remaining: quota.remaining(),
            limit: quota.limit,
        }
    }
}
