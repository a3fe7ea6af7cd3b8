// ABOUTME: Engine configuration combining nutrition coefficients and the tier limit table
// ABOUTME: Loads defaults, applies WELLNESS_* environment overrides and validates the result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the wellness engine
//!
//! - **Nutrition**: BMR coefficients, activity factors, goal offsets, macro splits
//! - **Tiers**: the immutable per-tier feature limit table
//!
//! [`EngineConfig::global`] loads once per process. Components that need a
//! different table (tests, hosts with their own plans) take an explicit
//! [`EngineConfig`] instead of reading the global.

/// Nutrition calculation configuration
pub mod nutrition;
/// Per-tier feature limits
pub mod tiers;

pub use nutrition::{
    ActivityFactorsConfig, BmrConfig, GoalAdjustmentConfig, MacroSplit, MacroSplitConfig,
    NutritionConfig,
};
pub use tiers::{FeatureGate, TierLimits, TierTable};

use crate::errors::AppError;
use crate::models::{Limit, UserTier};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is outside its accepted range
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// An environment variable could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Macro percentages do not add up to 100
    #[error("Macro split '{name}' sums to {total}%, expected 100%")]
    InvalidMacroSplit {
        /// Split name
        name: &'static str,
        /// Actual sum
        total: u16,
    },

    /// A higher tier grants less than a lower tier
    #[error("Tier '{higher}' grants less '{feature}' than tier '{lower}'")]
    NonMonotonicTiers {
        /// Offending feature
        feature: &'static str,
        /// Lower tier
        lower: &'static str,
        /// Higher tier
        higher: &'static str,
    },
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::config(error.to_string()).with_source(error)
    }
}

/// Global configuration singleton
static ENGINE_CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Main engine configuration container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Goal calculator configuration
    pub nutrition: NutritionConfig,
    /// Access tier limits
    pub tiers: TierTable,
}

impl EngineConfig {
    /// Get the global configuration instance
    pub fn global() -> &'static Self {
        ENGINE_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!("Failed to load engine config: {e}, using defaults");
                Self::default()
            })
        })
    }

    /// Load configuration from defaults and environment
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        debug!("Engine configuration loaded");
        Ok(config)
    }

    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    fn apply_env_limit(env_var_name: &str, target: &mut Limit) -> Result<(), ConfigError> {
        let mut raw = target.as_i64();
        Self::apply_env_var(env_var_name, &mut raw)?;
        *target = Limit::try_from(raw)
            .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        let goals = &mut self.nutrition.goals;
        Self::apply_env_var(
            "WELLNESS_MIN_CALORIE_GOAL",
            &mut goals.min_calorie_goal_kcal,
        )?;
        Self::apply_env_var("WELLNESS_LOSE_OFFSET_KCAL", &mut goals.lose_offset_kcal)?;
        Self::apply_env_var("WELLNESS_GAIN_OFFSET_KCAL", &mut goals.gain_offset_kcal)?;
        Self::apply_env_var(
            "WELLNESS_LOSE_RATE_KG_PER_WEEK",
            &mut goals.lose_rate_kg_per_week,
        )?;
        Self::apply_env_var(
            "WELLNESS_GAIN_RATE_KG_PER_WEEK",
            &mut goals.gain_rate_kg_per_week,
        )?;

        // Tier limits: WELLNESS_<TIER>_<FEATURE>
        for tier in UserTier::ALL {
            let prefix = format!("WELLNESS_{}", tier.as_str().to_uppercase());
            let limits = self.tiers.limits_mut(tier);
            Self::apply_env_limit(
                &format!("{prefix}_MEAL_LOGGING_PER_DAY"),
                &mut limits.meal_logging_per_day,
            )?;
            Self::apply_env_limit(
                &format!("{prefix}_MEAL_HISTORY_DAYS"),
                &mut limits.meal_history,
            )?;
            Self::apply_env_limit(
                &format!("{prefix}_CYCLE_TRACKING_DAYS"),
                &mut limits.cycle_tracking,
            )?;
            Self::apply_env_limit(
                &format!("{prefix}_MEAL_RECOMMENDATIONS_DAYS"),
                &mut limits.meal_recommendations,
            )?;
        }

        Ok(self)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        let nutrition = &self.nutrition;

        let factors = nutrition.activity_factors.as_array();
        if factors.iter().any(|f| !f.is_finite() || *f < 1.0) {
            return Err(ConfigError::InvalidRange(
                "activity factors must be at least 1.0",
            ));
        }
        if factors.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(ConfigError::InvalidRange(
                "activity factors must not decrease with activity level",
            ));
        }

        let goals = &nutrition.goals;
        if !goals.lose_offset_kcal.is_finite() || goals.lose_offset_kcal > 0.0 {
            return Err(ConfigError::InvalidRange(
                "lose offset must be zero or negative",
            ));
        }
        if !goals.gain_offset_kcal.is_finite() || goals.gain_offset_kcal < 0.0 {
            return Err(ConfigError::InvalidRange(
                "gain offset must be zero or positive",
            ));
        }
        if !(goals.lose_rate_kg_per_week > 0.0 && goals.gain_rate_kg_per_week > 0.0) {
            return Err(ConfigError::InvalidRange("weekly rates must be positive"));
        }
        if goals.min_calorie_goal_kcal == 0 {
            return Err(ConfigError::InvalidRange(
                "minimum calorie goal must be positive",
            ));
        }

        for (name, split) in nutrition.macro_splits.named() {
            if split.total() != 100 {
                return Err(ConfigError::InvalidMacroSplit {
                    name,
                    total: split.total(),
                });
            }
        }

        self.tiers.validate_monotonic()
    }
}
