// ABOUTME: Static per-tier feature limit table for capability, day-window and quota features
// ABOUTME: Immutable mapping keyed by tier with a monotonic-privilege validation check
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Tier limit configuration.
//!
//! | Tier       | Sync | Friends | Plans | Analytics | Cycle | Recs | History | Logs/day |
//! |------------|------|---------|-------|-----------|-------|------|---------|----------|
//! | guest      | no   | no      | no    | no        | 7     | 3    | 3       | 3        |
//! | registered | yes  | yes     | no    | no        | 30    | 7    | 30      | 10       |
//! | premium    | yes  | yes     | yes   | yes       | -1    | -1   | -1      | -1       |
//!
//! `-1` denotes unlimited.

use super::ConfigError;
use crate::models::{Limit, TieredFeature, UserTier};
use serde::{Deserialize, Serialize};

/// Feature limits for one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLimits {
    /// Health platform sync enabled
    pub health_sync: bool,
    /// Friends and sharing enabled
    pub friends: bool,
    /// Meal plans enabled
    pub meal_plans: bool,
    /// Analytics enabled
    pub analytics: bool,
    /// Days of cycle tracking visible
    pub cycle_tracking: Limit,
    /// Days of meal recommendations visible
    pub meal_recommendations: Limit,
    /// Days of meal history visible
    pub meal_history: Limit,
    /// Meal logs allowed per calendar day
    pub meal_logging_per_day: Limit,
}

/// Resolved limit of one feature for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureGate {
    /// Boolean capability
    Capability(bool),
    /// Rolling window of visible days
    Days(Limit),
    /// Count per calendar day
    DailyQuota(Limit),
}

impl FeatureGate {
    /// Whether any access is granted
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        match self {
            Self::Capability(enabled) => enabled,
            Self::Days(limit) | Self::DailyQuota(limit) => {
                !matches!(limit, Limit::Limited(0))
            }
        }
    }

    /// Whether `self` grants at least as much as `lower`
    #[must_use]
    pub fn covers(self, lower: Self) -> bool {
        match (self, lower) {
            (Self::Capability(higher), Self::Capability(lower)) => higher || !lower,
            (Self::Days(higher), Self::Days(lower))
            | (Self::DailyQuota(higher), Self::DailyQuota(lower)) => higher >= lower,
            _ => false,
        }
    }
}

impl TierLimits {
    /// Resolve the gate of a feature
    #[must_use]
    pub const fn gate(&self, feature: TieredFeature) -> FeatureGate {
        match feature {
            TieredFeature::HealthSync => FeatureGate::Capability(self.health_sync),
            TieredFeature::Friends => FeatureGate::Capability(self.friends),
            TieredFeature::MealPlans => FeatureGate::Capability(self.meal_plans),
            TieredFeature::Analytics => FeatureGate::Capability(self.analytics),
            TieredFeature::CycleTracking => FeatureGate::Days(self.cycle_tracking),
            TieredFeature::MealRecommendations => FeatureGate::Days(self.meal_recommendations),
            TieredFeature::MealHistory => FeatureGate::Days(self.meal_history),
            TieredFeature::MealLogging => FeatureGate::DailyQuota(self.meal_logging_per_day),
        }
    }

    /// Day window for a day-limited feature, `None` for other kinds
    #[must_use]
    pub const fn day_limit(&self, feature: TieredFeature) -> Option<Limit> {
        match self.gate(feature) {
            FeatureGate::Days(limit) => Some(limit),
            FeatureGate::Capability(_) | FeatureGate::DailyQuota(_) => None,
        }
    }

    /// Whether the feature is available at all
    #[must_use]
    pub const fn is_enabled(&self, feature: TieredFeature) -> bool {
        self.gate(feature).is_enabled()
    }

    fn guest() -> Self {
        Self {
            health_sync: false,
            friends: false,
            meal_plans: false,
            analytics: false,
            cycle_tracking: Limit::Limited(7),
            meal_recommendations: Limit::Limited(3),
            meal_history: Limit::Limited(3),
            meal_logging_per_day: Limit::Limited(3),
        }
    }

    fn registered() -> Self {
        Self {
            health_sync: true,
            friends: true,
            meal_plans: false,
            analytics: false,
            cycle_tracking: Limit::Limited(30),
            meal_recommendations: Limit::Limited(7),
            meal_history: Limit::Limited(30),
            meal_logging_per_day: Limit::Limited(10),
        }
    }

    fn premium() -> Self {
        Self {
            health_sync: true,
            friends: true,
            meal_plans: true,
            analytics: true,
            cycle_tracking: Limit::Unlimited,
            meal_recommendations: Limit::Unlimited,
            meal_history: Limit::Unlimited,
            meal_logging_per_day: Limit::Unlimited,
        }
    }
}

/// Immutable table of limits keyed by tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    limits: [TierLimits; UserTier::ALL.len()],
}

impl TierTable {
    /// Build a table from per-tier limits
    #[must_use]
    pub const fn new(guest: TierLimits, registered: TierLimits, premium: TierLimits) -> Self {
        Self {
            limits: [guest, registered, premium],
        }
    }

    /// Limits for a tier
    #[must_use]
    pub const fn limits(&self, tier: UserTier) -> &TierLimits {
        &self.limits[tier.index()]
    }

    pub(crate) fn limits_mut(&mut self, tier: UserTier) -> &mut TierLimits {
        &mut self.limits[tier.index()]
    }

    /// Check that no tier grants less than the tier below it
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NonMonotonicTiers` naming the first offending feature
    pub fn validate_monotonic(&self) -> Result<(), ConfigError> {
        for pair in UserTier::ALL.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            for feature in TieredFeature::ALL {
                let lower_gate = self.limits(lower).gate(feature);
                let higher_gate = self.limits(higher).gate(feature);
                if !higher_gate.covers(lower_gate) {
                    return Err(ConfigError::NonMonotonicTiers {
                        feature: feature.as_str(),
                        lower: lower.as_str(),
                        higher: higher.as_str(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::new(
            TierLimits::guest(),
            TierLimits::registered(),
            TierLimits::premium(),
        )
    }
}
