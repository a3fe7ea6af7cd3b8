// ABOUTME: Physiological, nutritional and storage constants for the wellness engine
// ABOUTME: Default coefficients used when no environment override is supplied
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Hardcoded defaults grouped by domain. Tunable values are surfaced through
//! [`crate::config::EngineConfig`]; the constants here are the defaults it starts from.

/// Energy density of macronutrients
pub mod energy {
    /// Protein energy density (kcal per gram)
    pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
    /// Carbohydrate energy density (kcal per gram)
    pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
    /// Fat energy density (kcal per gram)
    pub const KCAL_PER_GRAM_FAT: f64 = 9.0;
}

/// Mifflin-St Jeor coefficients and activity multipliers
///
/// Reference: Mifflin et al. (1990) DOI: 10.1093/ajcn/51.2.241
pub mod bmr {
    /// Weight coefficient (kcal per kg)
    pub const MSJ_WEIGHT_COEF: f64 = 10.0;
    /// Height coefficient (kcal per cm)
    pub const MSJ_HEIGHT_COEF: f64 = 6.25;
    /// Age coefficient (kcal per year)
    pub const MSJ_AGE_COEF: f64 = -5.0;
    /// Male constant
    pub const MSJ_MALE_CONSTANT: f64 = 5.0;
    /// Female constant
    pub const MSJ_FEMALE_CONSTANT: f64 = -161.0;

    /// Sedentary (little/no exercise)
    pub const ACTIVITY_SEDENTARY: f64 = 1.2;
    /// Light exercise 1-3 days/week
    pub const ACTIVITY_LIGHT: f64 = 1.375;
    /// Moderate exercise 3-5 days/week
    pub const ACTIVITY_MODERATE: f64 = 1.55;
    /// Hard exercise 6-7 days/week
    pub const ACTIVITY_ACTIVE: f64 = 1.725;
    /// Hard training twice a day or physical job
    pub const ACTIVITY_VERY_ACTIVE: f64 = 1.9;
}

/// Weight-goal adjustments
pub mod goals {
    /// Daily deficit for a `lose` goal (~0.5 kg/week)
    pub const LOSE_OFFSET_KCAL: f64 = -500.0;
    /// Daily surplus for a `gain` goal (~0.3 kg/week)
    pub const GAIN_OFFSET_KCAL: f64 = 300.0;
    /// Expected weekly loss on a `lose` goal
    pub const LOSE_RATE_KG_PER_WEEK: f64 = 0.5;
    /// Expected weekly gain on a `gain` goal
    pub const GAIN_RATE_KG_PER_WEEK: f64 = 0.3;
    /// Safety floor; calorie goals are clamped to this value, never below
    pub const MIN_CALORIE_GOAL_KCAL: u32 = 1200;
    /// Tolerance when rounding fractional weeks up
    pub const WEEKS_ROUNDING_EPSILON: f64 = 1e-9;
}

/// Accepted biometric input ranges
pub mod limits {
    /// Minimum accepted age (years)
    pub const MIN_AGE_YEARS: u32 = 1;
    /// Maximum accepted age (years)
    pub const MAX_AGE_YEARS: u32 = 120;
    /// Maximum accepted height (cm)
    pub const MAX_HEIGHT_CM: f64 = 300.0;
    /// Maximum accepted weight (kg)
    pub const MAX_WEIGHT_KG: f64 = 300.0;
}

/// Document store collection names
pub mod storage {
    /// Collection holding per-user daily quota documents
    pub const QUOTA_COLLECTION: &str = "quotas";
    /// Document name of the meal-logging quota
    pub const MEAL_LOGGING_DOCUMENT: &str = "meal_logging";
    /// Collection holding per-user profile documents
    pub const PROFILE_COLLECTION: &str = "profiles";
    /// Document name of the nutrition targets inside a profile
    pub const TARGETS_DOCUMENT: &str = "nutrition";
    /// Conditional writes are attempted this many times before surfacing a conflict
    pub const MAX_WRITE_ATTEMPTS: u32 = 2;
}

/// Service identity for structured logging
pub mod service_names {
    /// Default service name
    pub const WELLNESS_ENGINE: &str = "wellness-engine";
}
