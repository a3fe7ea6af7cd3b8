// ABOUTME: Goal calculator: energy and macronutrient targets and time-to-goal projections
// ABOUTME: Pure calculations plus persistence of the resulting profile targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition intelligence.
//!
//! The calculator functions are synchronous and side-effect free, so they can be
//! called from any number of threads without coordination.

/// Calorie, macro and time-to-goal calculations
pub mod nutrition_calculator;
/// Persistence of calculated targets on the user profile
pub mod profile_targets;

pub use nutrition_calculator::{
    calculate_bmr, calculate_calorie_goal, calculate_daily_targets, calculate_macro_targets,
    calculate_mifflin_st_jeor, calculate_tdee, estimate_goal, estimate_weeks_to_goal,
    DailyTargets, GoalEstimate, MacroTargets,
};
pub use profile_targets::{ProfileTargetsRepository, StoredTargets};
