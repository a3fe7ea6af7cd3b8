// ABOUTME: Nutrition calculation algorithms using peer-reviewed scientific formulas
// ABOUTME: BMR, maintenance calories, goal-adjusted calorie targets, macro splits and time-to-goal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition Calculator Module
//!
//! Turns a [`BiometricProfile`] into a daily calorie goal and macronutrient
//! targets, and projects how long a weight goal will take. Every function is
//! pure: same inputs and configuration, same output.
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>
//!
//! - Hall, K.D. (2008). What is the required energy deficit per unit weight loss?
//!   *International Journal of Obesity*, 32(3), 573-576.
//!   <https://doi.org/10.1038/sj.ijo.0803720>
//!
//! - Evert, A.B., et al. (2019). Nutrition therapy for adults with diabetes or prediabetes.
//!   *Diabetes Care*, 42(5), 731-754.
//!   <https://doi.org/10.2337/dci19-0014>

use crate::config::{
    ActivityFactorsConfig, BmrConfig, GoalAdjustmentConfig, MacroSplit, MacroSplitConfig,
    NutritionConfig,
};
use crate::constants::energy::{KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN};
use crate::constants::goals::WEEKS_ROUNDING_EPSILON;
use crate::constants::limits::{MAX_AGE_YEARS, MAX_HEIGHT_CM, MAX_WEIGHT_KG, MIN_AGE_YEARS};
use crate::errors::{AppError, AppResult};
use crate::models::{
    validate_positive, ActivityLevel, BiologicalSex, BiometricProfile, WeightGoal,
};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Daily macronutrient targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    /// Calorie goal the macros were derived from (kcal/day)
    pub calories: u32,
    /// Protein (grams/day)
    pub protein_g: u32,
    /// Carbohydrates (grams/day)
    pub carbs_g: u32,
    /// Fat (grams/day)
    pub fat_g: u32,
    /// Percentage split applied
    pub split: MacroSplit,
}

impl MacroTargets {
    /// Calories implied by the gram targets (4/4/9 kcal per gram)
    #[must_use]
    pub fn total_kcal(&self) -> f64 {
        f64::from(self.fat_g).mul_add(
            KCAL_PER_GRAM_FAT,
            f64::from(self.protein_g)
                .mul_add(KCAL_PER_GRAM_PROTEIN, f64::from(self.carbs_g) * KCAL_PER_GRAM_CARBS),
        )
    }
}

/// Projected time to reach a target weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEstimate {
    /// Whole weeks, 0 when no meaningful estimate exists
    pub weeks: u32,
    /// Projected completion date, `None` when `weeks` is 0
    pub target_date: Option<NaiveDate>,
}

/// Complete daily targets for one profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTargets {
    /// Basal Metabolic Rate (kcal/day)
    pub bmr: f64,
    /// Maintenance calories (kcal/day)
    pub tdee: f64,
    /// Goal-adjusted calorie target (kcal/day)
    pub calorie_goal: u32,
    /// Whether the safety floor raised the calorie goal
    pub floor_applied: bool,
    /// Macronutrient targets
    pub macros: MacroTargets,
}

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation (1990)
///
/// Formula: BMR = (10 x `weight_kg`) + (6.25 x `height_cm`) - (5 x age) + `sex_constant`
/// - Men: +5
/// - Women: -161
///
/// # Reference
/// Mifflin et al. (1990) DOI: 10.1093/ajcn/51.2.241
///
/// # Errors
///
/// Returns an error if input values are out of valid ranges
pub fn calculate_mifflin_st_jeor(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    sex: BiologicalSex,
    config: &BmrConfig,
) -> AppResult<f64> {
    validate_positive("weight_kg", weight_kg, MAX_WEIGHT_KG)?;
    validate_positive("height_cm", height_cm, MAX_HEIGHT_CM)?;
    if !(MIN_AGE_YEARS..=MAX_AGE_YEARS).contains(&age) {
        return Err(AppError::out_of_range(format!(
            "Age must be between {MIN_AGE_YEARS} and {MAX_AGE_YEARS} years"
        ))
        .with_resource_id("age"));
    }

    let weight_component = config.msj_weight_coef * weight_kg;
    let height_component = config.msj_height_coef * height_cm;
    let age_component = config.msj_age_coef * f64::from(age);

    let sex_constant = match sex {
        BiologicalSex::Male => config.msj_male_constant,
        BiologicalSex::Female => config.msj_female_constant,
    };

    Ok(weight_component + height_component + age_component + sex_constant)
}

/// Basal Metabolic Rate of a profile
///
/// # Errors
///
/// Returns a validation error if any profile field is out of range
pub fn calculate_bmr(profile: &BiometricProfile, config: &BmrConfig) -> AppResult<f64> {
    calculate_mifflin_st_jeor(
        profile.weight_kg,
        profile.height_cm,
        profile.age,
        profile.biological_sex,
        config,
    )
}

/// Calculate maintenance calories (Total Daily Energy Expenditure)
///
/// Formula: TDEE = BMR x Activity Factor
///
/// # Errors
///
/// Returns an error if BMR is not positive
pub fn calculate_tdee(
    bmr: f64,
    activity_level: ActivityLevel,
    config: &ActivityFactorsConfig,
) -> AppResult<f64> {
    if !bmr.is_finite() || bmr <= 0.0 {
        return Err(AppError::invalid_input("BMR must be positive"));
    }
    Ok(bmr * config.factor(activity_level))
}

/// Apply the goal offset to maintenance calories and clamp to the safety floor
///
/// Returns the rounded goal and whether the floor was applied.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// Safe: value is rounded and at least the positive floor
fn goal_adjusted_calories(tdee: f64, goal: WeightGoal, config: &GoalAdjustmentConfig) -> (u32, bool) {
    let adjusted = (tdee + config.offset_kcal(goal)).round();
    let floor = config.min_calorie_goal_kcal;
    if adjusted < f64::from(floor) {
        debug!(
            adjusted_kcal = adjusted,
            floor_kcal = floor,
            "Calorie goal clamped to safety floor"
        );
        (floor, true)
    } else {
        (adjusted as u32, false)
    }
}

/// Calculate the daily calorie goal for a profile
///
/// BMR (Mifflin-St Jeor) x activity factor, plus the goal offset
/// (-500 kcal for `lose`, +300 kcal for `gain`), rounded to the nearest
/// kcal and never below the configured floor (1200 kcal by default).
///
/// # Errors
///
/// Returns a validation error if any numeric field is out of range
pub fn calculate_calorie_goal(
    profile: &BiometricProfile,
    config: &NutritionConfig,
) -> AppResult<u32> {
    let bmr = calculate_bmr(profile, &config.bmr)?;
    let tdee = calculate_tdee(bmr.max(1.0), profile.activity_level, &config.activity_factors)?;
    Ok(goal_adjusted_calories(tdee, profile.weight_goal, &config.goals).0)
}

/// Calculate macronutrient targets from a calorie goal
///
/// Splits calories by the goal's percentage policy (diabetic variants carry more
/// protein and fewer carbohydrates), converts with 4/4/9 kcal per gram and
/// rounds each macro to the nearest gram.
///
/// # Errors
///
/// Returns an error if `calorie_goal` is zero
pub fn calculate_macro_targets(
    calorie_goal: u32,
    weight_goal: WeightGoal,
    is_diabetic: bool,
    config: &MacroSplitConfig,
) -> AppResult<MacroTargets> {
    if calorie_goal == 0 {
        return Err(AppError::out_of_range("Calorie goal must be positive")
            .with_resource_id("calorie_goal"));
    }

    let split = config.split_for(weight_goal, is_diabetic);
    let kcal = f64::from(calorie_goal);
    let exact = [
        kcal * f64::from(split.protein_pct) / 100.0 / KCAL_PER_GRAM_PROTEIN,
        kcal * f64::from(split.carbs_pct) / 100.0 / KCAL_PER_GRAM_CARBS,
        kcal * f64::from(split.fat_pct) / 100.0 / KCAL_PER_GRAM_FAT,
    ];
    let [protein_g, carbs_g, fat_g] = exact.map(nearest_gram);

    Ok(MacroTargets {
        calories: calorie_goal,
        protein_g,
        carbs_g,
        fat_g,
        split,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// Safe: gram amounts are non-negative and far below u32::MAX
fn nearest_gram(exact: f64) -> u32 {
    exact.round() as u32
}

/// Estimate whole weeks until `target_weight_kg` is reached
///
/// Returns 0 for `maintain`, for equal weights, and when the direction of the
/// change contradicts the goal (e.g. `lose` with a higher target). Otherwise the
/// absolute difference is divided by the weekly rate (0.5 kg for `lose`, 0.3 kg
/// for `gain`) and rounded up.
///
/// # Errors
///
/// Returns a validation error for non-positive or non-finite weights
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// Safe: weights are bounded, so the week count is small and non-negative
pub fn estimate_weeks_to_goal(
    current_weight_kg: f64,
    target_weight_kg: f64,
    goal: WeightGoal,
    config: &GoalAdjustmentConfig,
) -> AppResult<u32> {
    validate_positive("current_weight_kg", current_weight_kg, MAX_WEIGHT_KG)?;
    validate_positive("target_weight_kg", target_weight_kg, MAX_WEIGHT_KG)?;

    let Some(rate) = config.weekly_rate_kg(goal) else {
        return Ok(0);
    };

    let delta = target_weight_kg - current_weight_kg;
    let direction_matches = match goal {
        WeightGoal::Lose => delta < 0.0,
        WeightGoal::Gain => delta > 0.0,
        WeightGoal::Maintain => false,
    };
    if !direction_matches {
        return Ok(0);
    }

    let weeks = (delta.abs() / rate - WEEKS_ROUNDING_EPSILON).ceil();
    Ok(weeks.max(0.0) as u32)
}

/// Estimate weeks to goal and the projected completion date
///
/// # Errors
///
/// Returns a validation error for non-positive or non-finite weights
pub fn estimate_goal(
    current_weight_kg: f64,
    target_weight_kg: f64,
    goal: WeightGoal,
    start_date: NaiveDate,
    config: &GoalAdjustmentConfig,
) -> AppResult<GoalEstimate> {
    let weeks = estimate_weeks_to_goal(current_weight_kg, target_weight_kg, goal, config)?;
    let target_date = if weeks == 0 {
        None
    } else {
        start_date.checked_add_days(Days::new(u64::from(weeks) * 7))
    };
    Ok(GoalEstimate { weeks, target_date })
}

/// Calculate complete daily targets for a profile
///
/// Main entry point for onboarding and profile updates, combining BMR,
/// maintenance calories, the goal-adjusted calorie target and macros.
///
/// # Errors
///
/// Returns a validation error if the profile is out of range
pub fn calculate_daily_targets(
    profile: &BiometricProfile,
    is_diabetic: bool,
    config: &NutritionConfig,
) -> AppResult<DailyTargets> {
    profile.validate()?;

    let bmr = calculate_bmr(profile, &config.bmr)?;
    let tdee = calculate_tdee(bmr.max(1.0), profile.activity_level, &config.activity_factors)?;
    let (calorie_goal, floor_applied) =
        goal_adjusted_calories(tdee, profile.weight_goal, &config.goals);
    let macros = calculate_macro_targets(
        calorie_goal,
        profile.weight_goal,
        is_diabetic,
        &config.macro_splits,
    )?;

    Ok(DailyTargets {
        bmr,
        tdee,
        calorie_goal,
        floor_applied,
        macros,
    })
}
