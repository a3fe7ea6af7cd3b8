// ABOUTME: Nutrition configuration for calorie and macronutrient target calculation
// ABOUTME: Configures BMR coefficients, activity factors, goal offsets and macro splits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition Calculation Configuration
//!
//! # Scientific References
//!
//! - BMR: Mifflin et al. (1990) DOI: 10.1093/ajcn/51.2.241
//! - Activity factors: `McArdle`, Katch & Katch (2010), Exercise Physiology
//! - Diabetic macro guidance: Evert et al. (2019) DOI: 10.2337/dci19-0014

use crate::constants::{bmr, goals};
use crate::models::{ActivityLevel, WeightGoal};
use serde::{Deserialize, Serialize};

/// Nutrition configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutritionConfig {
    /// Basal Metabolic Rate (BMR) coefficients
    pub bmr: BmrConfig,
    /// Activity factor multipliers for maintenance calories
    pub activity_factors: ActivityFactorsConfig,
    /// Weight-goal offsets, weekly rates and the calorie floor
    pub goals: GoalAdjustmentConfig,
    /// Macro split policy
    pub macro_splits: MacroSplitConfig,
}

/// BMR (Basal Metabolic Rate) calculation configuration
///
/// Reference: Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
/// American Journal of Clinical Nutrition, 51(2), 241-247. DOI: 10.1093/ajcn/51.2.241
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmrConfig {
    /// Mifflin-St Jeor weight coefficient (10.0)
    pub msj_weight_coef: f64,
    /// Mifflin-St Jeor height coefficient (6.25)
    pub msj_height_coef: f64,
    /// Mifflin-St Jeor age coefficient (-5.0)
    pub msj_age_coef: f64,
    /// Mifflin-St Jeor male constant (+5)
    pub msj_male_constant: f64,
    /// Mifflin-St Jeor female constant (-161)
    pub msj_female_constant: f64,
}

impl Default for BmrConfig {
    fn default() -> Self {
        Self {
            msj_weight_coef: bmr::MSJ_WEIGHT_COEF,
            msj_height_coef: bmr::MSJ_HEIGHT_COEF,
            msj_age_coef: bmr::MSJ_AGE_COEF,
            msj_male_constant: bmr::MSJ_MALE_CONSTANT,
            msj_female_constant: bmr::MSJ_FEMALE_CONSTANT,
        }
    }
}

/// Activity factor multipliers for maintenance calories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFactorsConfig {
    /// Sedentary: 1.2
    pub sedentary: f64,
    /// Light: 1.375
    pub light: f64,
    /// Moderate: 1.55
    pub moderate: f64,
    /// Active: 1.725
    pub active: f64,
    /// Very active: 1.9
    pub very_active: f64,
}

impl ActivityFactorsConfig {
    /// Multiplier for an activity level
    #[must_use]
    pub const fn factor(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::Light => self.light,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::Active => self.active,
            ActivityLevel::VeryActive => self.very_active,
        }
    }

    /// Factors in activity order, for validation
    #[must_use]
    pub const fn as_array(&self) -> [f64; 5] {
        [
            self.sedentary,
            self.light,
            self.moderate,
            self.active,
            self.very_active,
        ]
    }
}

impl Default for ActivityFactorsConfig {
    fn default() -> Self {
        Self {
            sedentary: bmr::ACTIVITY_SEDENTARY,
            light: bmr::ACTIVITY_LIGHT,
            moderate: bmr::ACTIVITY_MODERATE,
            active: bmr::ACTIVITY_ACTIVE,
            very_active: bmr::ACTIVITY_VERY_ACTIVE,
        }
    }
}

/// Weight-goal adjustments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalAdjustmentConfig {
    /// Daily offset applied for `lose` (negative)
    pub lose_offset_kcal: f64,
    /// Daily offset applied for `gain` (positive)
    pub gain_offset_kcal: f64,
    /// Weekly loss used for time-to-goal estimates
    pub lose_rate_kg_per_week: f64,
    /// Weekly gain used for time-to-goal estimates
    pub gain_rate_kg_per_week: f64,
    /// Calorie goals are clamped to at least this value
    pub min_calorie_goal_kcal: u32,
}

impl GoalAdjustmentConfig {
    /// Daily calorie offset for a goal direction
    #[must_use]
    pub const fn offset_kcal(&self, goal: WeightGoal) -> f64 {
        match goal {
            WeightGoal::Lose => self.lose_offset_kcal,
            WeightGoal::Maintain => 0.0,
            WeightGoal::Gain => self.gain_offset_kcal,
        }
    }

    /// Weekly weight change rate for a goal direction, `None` for maintain
    #[must_use]
    pub const fn weekly_rate_kg(&self, goal: WeightGoal) -> Option<f64> {
        match goal {
            WeightGoal::Lose => Some(self.lose_rate_kg_per_week),
            WeightGoal::Maintain => None,
            WeightGoal::Gain => Some(self.gain_rate_kg_per_week),
        }
    }
}

impl Default for GoalAdjustmentConfig {
    fn default() -> Self {
        Self {
            lose_offset_kcal: goals::LOSE_OFFSET_KCAL,
            gain_offset_kcal: goals::GAIN_OFFSET_KCAL,
            lose_rate_kg_per_week: goals::LOSE_RATE_KG_PER_WEEK,
            gain_rate_kg_per_week: goals::GAIN_RATE_KG_PER_WEEK,
            min_calorie_goal_kcal: goals::MIN_CALORIE_GOAL_KCAL,
        }
    }
}

/// Percentage split of daily calories (protein%, carbs%, fat%)
///
/// All percentages must sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSplit {
    /// Protein percentage (0-100)
    pub protein_pct: u8,
    /// Carbohydrate percentage (0-100)
    pub carbs_pct: u8,
    /// Fat percentage (0-100)
    pub fat_pct: u8,
}

impl MacroSplit {
    /// Create a new macro split
    ///
    /// # Panics
    ///
    /// Panics in debug mode if percentages don't sum to 100
    #[must_use]
    pub const fn new(protein_pct: u8, carbs_pct: u8, fat_pct: u8) -> Self {
        debug_assert!(
            protein_pct
                .saturating_add(carbs_pct)
                .saturating_add(fat_pct)
                == 100,
            "Macro percentages must sum to 100"
        );
        Self {
            protein_pct,
            carbs_pct,
            fat_pct,
        }
    }

    /// Sum of the three percentages
    #[must_use]
    pub fn total(&self) -> u16 {
        u16::from(self.protein_pct) + u16::from(self.carbs_pct) + u16::from(self.fat_pct)
    }

    /// Get as a tuple (protein, carbs, fat)
    #[must_use]
    pub const fn as_tuple(&self) -> (u8, u8, u8) {
        (self.protein_pct, self.carbs_pct, self.fat_pct)
    }
}

/// Macro split policy per goal, with a diabetic variant
///
/// Weight change goals carry more protein than maintain; the diabetic variants
/// shift further toward protein and away from carbohydrate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroSplitConfig {
    /// Maintain: 25/50/25
    pub maintain: MacroSplit,
    /// Lose: 30/40/30
    pub lose: MacroSplit,
    /// Gain: 30/45/25
    pub gain: MacroSplit,
    /// Maintain, diabetic: 30/35/35
    pub diabetic_maintain: MacroSplit,
    /// Lose, diabetic: 35/30/35
    pub diabetic_lose: MacroSplit,
    /// Gain, diabetic: 35/35/30
    pub diabetic_gain: MacroSplit,
}

impl MacroSplitConfig {
    /// Split for a goal and diabetic status
    #[must_use]
    pub const fn split_for(&self, goal: WeightGoal, is_diabetic: bool) -> MacroSplit {
        match (goal, is_diabetic) {
            (WeightGoal::Maintain, false) => self.maintain,
            (WeightGoal::Lose, false) => self.lose,
            (WeightGoal::Gain, false) => self.gain,
            (WeightGoal::Maintain, true) => self.diabetic_maintain,
            (WeightGoal::Lose, true) => self.diabetic_lose,
            (WeightGoal::Gain, true) => self.diabetic_gain,
        }
    }

    /// Every configured split with its name, for validation
    #[must_use]
    pub const fn named(&self) -> [(&'static str, MacroSplit); 6] {
        [
            ("maintain", self.maintain),
            ("lose", self.lose),
            ("gain", self.gain),
            ("diabetic_maintain", self.diabetic_maintain),
            ("diabetic_lose", self.diabetic_lose),
            ("diabetic_gain", self.diabetic_gain),
        ]
    }
}

impl Default for MacroSplitConfig {
    fn default() -> Self {
        Self {
            maintain: MacroSplit::new(25, 50, 25),
            lose: MacroSplit::new(30, 40, 30),
            gain: MacroSplit::new(30, 45, 25),
            diabetic_maintain: MacroSplit::new(30, 35, 35),
            diabetic_lose: MacroSplit::new(35, 30, 35),
            diabetic_gain: MacroSplit::new(35, 35, 30),
        }
    }
}
