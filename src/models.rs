// ABOUTME: Core data models for biometric inputs, account tiers and tiered features
// ABOUTME: Typed enums with snake_case serde names and validated profile construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Inputs consumed by the goal calculator and the identifiers used by the
//! access tier gate. Enum names round-trip through their snake_case form so
//! documents written by other clients decode without a mapping layer.

use crate::constants::limits::{MAX_AGE_YEARS, MAX_HEIGHT_CM, MAX_WEIGHT_KG, MIN_AGE_YEARS};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Biological sex used by the BMR formula
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalSex {
    /// Female constant (-161)
    Female,
    /// Male constant (+5)
    Male,
}

/// Activity level for the maintenance-calorie multiplier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Hard training twice a day
    VeryActive,
}

/// Direction of the user's weight goal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeightGoal {
    /// Caloric deficit
    Lose,
    /// Caloric balance
    Maintain,
    /// Caloric surplus
    Gain,
}

macro_rules! snake_case_enum_str {
    ($ty:ident, $label:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Snake-case name used in documents and configuration
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    other => Err(AppError::invalid_input(format!(
                        "Unrecognized {} '{other}'",
                        $label
                    ))),
                }
            }
        }
    };
}

snake_case_enum_str!(BiologicalSex, "biological sex", {
    Female => "female",
    Male => "male",
});

snake_case_enum_str!(ActivityLevel, "activity level", {
    Sedentary => "sedentary",
    Light => "light",
    Moderate => "moderate",
    Active => "active",
    VeryActive => "very_active",
});

snake_case_enum_str!(WeightGoal, "weight goal", {
    Lose => "lose",
    Maintain => "maintain",
    Gain => "gain",
});

/// Biometric and lifestyle inputs for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiometricProfile {
    /// Age in years
    pub age: u32,
    /// Height in centimeters
    pub height_cm: f64,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Biological sex
    pub biological_sex: BiologicalSex,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Weight goal direction
    pub weight_goal: WeightGoal,
}

impl BiometricProfile {
    /// Decode a profile from a JSON document
    ///
    /// # Errors
    ///
    /// Returns a validation error when a field is missing, an enum value is
    /// unrecognized or a numeric value is outside its accepted range
    pub fn from_json(document: &str) -> AppResult<Self> {
        let value: serde_json::Value = serde_json::from_str(document)
            .map_err(|e| AppError::invalid_input(format!("Malformed profile document: {e}")))?;

        for field in [
            "age",
            "height_cm",
            "weight_kg",
            "biological_sex",
            "activity_level",
            "weight_goal",
        ] {
            if matches!(value.get(field), None | Some(serde_json::Value::Null)) {
                return Err(AppError::missing_field(field));
            }
        }

        let profile: Self = serde_json::from_value(value)
            .map_err(|e| AppError::invalid_input(format!("Invalid profile document: {e}")))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Check every numeric field against its accepted range
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for a non-positive, non-finite or implausibly large value
    pub fn validate(&self) -> AppResult<()> {
        if !(MIN_AGE_YEARS..=MAX_AGE_YEARS).contains(&self.age) {
            return Err(AppError::out_of_range(format!(
                "Age must be between {MIN_AGE_YEARS} and {MAX_AGE_YEARS} years"
            ))
            .with_resource_id("age"));
        }
        validate_positive("height_cm", self.height_cm, MAX_HEIGHT_CM)?;
        validate_positive("weight_kg", self.weight_kg, MAX_WEIGHT_KG)?;
        Ok(())
    }
}

/// Reject non-finite, non-positive or above-maximum values
pub(crate) fn validate_positive(field: &str, value: f64, max: f64) -> AppResult<()> {
    if !value.is_finite() || value <= 0.0 || value > max {
        return Err(
            AppError::out_of_range(format!("{field} must be greater than 0 and at most {max}"))
                .with_resource_id(field),
        );
    }
    Ok(())
}

/// Account privilege level, ordered `Guest < Registered < Premium`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserTier {
    /// Unauthenticated session
    Guest,
    /// Authenticated account
    Registered,
    /// Paid subscription
    Premium,
}

impl UserTier {
    /// All tiers in privilege order
    pub const ALL: [Self; 3] = [Self::Guest, Self::Registered, Self::Premium];

    /// Tier implied by authentication state alone
    ///
    /// Premium is never inferred here; it comes from subscription state.
    #[must_use]
    pub const fn from_auth_state(authenticated: bool) -> Self {
        if authenticated {
            Self::Registered
        } else {
            Self::Guest
        }
    }

    /// Position in [`UserTier::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Guest => 0,
            Self::Registered => 1,
            Self::Premium => 2,
        }
    }

    /// Next tier up, if any
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Guest => Some(Self::Registered),
            Self::Registered => Some(Self::Premium),
            Self::Premium => None,
        }
    }
}

snake_case_enum_str!(UserTier, "tier", {
    Guest => "guest",
    Registered => "registered",
    Premium => "premium",
});

/// Feature whose availability depends on the account tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TieredFeature {
    /// Logging meals (daily quota)
    MealLogging,
    /// Viewing past meal logs (day window)
    MealHistory,
    /// Cycle tracking (day window)
    CycleTracking,
    /// Meal recommendations (day window)
    MealRecommendations,
    /// Health platform sync
    HealthSync,
    /// Friends and sharing
    Friends,
    /// Meal plans
    MealPlans,
    /// Analytics dashboards
    Analytics,
}

impl TieredFeature {
    /// Every tiered feature
    pub const ALL: [Self; 8] = [
        Self::MealLogging,
        Self::MealHistory,
        Self::CycleTracking,
        Self::MealRecommendations,
        Self::HealthSync,
        Self::Friends,
        Self::MealPlans,
        Self::Analytics,
    ];
}

snake_case_enum_str!(TieredFeature, "feature", {
    MealLogging => "meal_logging",
    MealHistory => "meal_history",
    CycleTracking => "cycle_tracking",
    MealRecommendations => "meal_recommendations",
    HealthSync => "health_sync",
    Friends => "friends",
    MealPlans => "meal_plans",
    Analytics => "analytics",
});

/// Wire value denoting an unlimited allowance
pub const UNLIMITED: i64 = -1;

/// A count or day allowance that may be unlimited
///
/// Serialized as an integer where `-1` means unlimited. Ordering treats
/// `Unlimited` as greater than every finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Limit {
    /// Finite allowance
    Limited(u32),
    /// No bound
    Unlimited,
}

impl Limit {
    /// Whether the allowance is unbounded
    #[must_use]
    pub const fn is_unlimited(self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// Finite value, if any
    #[must_use]
    pub const fn finite(self) -> Option<u32> {
        match self {
            Self::Limited(value) => Some(value),
            Self::Unlimited => None,
        }
    }

    /// Integer form with `-1` for unlimited
    #[must_use]
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Limited(value) => i64::from(value),
            Self::Unlimited => UNLIMITED,
        }
    }
}

impl Ord for Limit {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Limited(a), Self::Limited(b)) => a.cmp(b),
            (Self::Limited(_), Self::Unlimited) => Ordering::Less,
            (Self::Unlimited, Self::Limited(_)) => Ordering::Greater,
            (Self::Unlimited, Self::Unlimited) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Limit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Limit> for i64 {
    fn from(limit: Limit) -> Self {
        limit.as_i64()
    }
}

impl TryFrom<i64> for Limit {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == UNLIMITED {
            return Ok(Self::Unlimited);
        }
        u32::try_from(value).map(Self::Limited).map_err(|_| {
            AppError::out_of_range(format!(
                "Limit must be -1 (unlimited) or a non-negative count, got {value}"
            ))
        })
    }
}

impl Display for Limit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(value) => write!(f, "{value}"),
            Self::Unlimited => f.write_str("unlimited"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering_follows_privilege() {
        assert!(UserTier::Guest < UserTier::Registered);
        assert!(UserTier::Registered < UserTier::Premium);
        assert_eq!(UserTier::from_auth_state(false), UserTier::Guest);
        assert_eq!(UserTier::from_auth_state(true), UserTier::Registered);
    }

    #[test]
    fn test_limit_ordering_puts_unlimited_last() {
        assert!(Limit::Limited(3) < Limit::Limited(30));
        assert!(Limit::Limited(u32::MAX) < Limit::Unlimited);
        assert_eq!(Limit::Unlimited.cmp(&Limit::Unlimited), Ordering::Equal);
    }

    #[test]
    fn test_limit_serializes_unlimited_as_minus_one() {
        assert_eq!(serde_json::to_value(Limit::Unlimited).unwrap(), -1);
        assert_eq!(serde_json::to_value(Limit::Limited(3)).unwrap(), 3);
        let parsed: Limit = serde_json::from_value(serde_json::json!(-1)).unwrap();
        assert_eq!(parsed, Limit::Unlimited);
        assert!(serde_json::from_value::<Limit>(serde_json::json!(-7)).is_err());
    }

    #[test]
    fn test_feature_names_parse() {
        for feature in TieredFeature::ALL {
            assert_eq!(feature.as_str().parse::<TieredFeature>().unwrap(), feature);
        }
        assert!("streaks".parse::<TieredFeature>().is_err());
        assert_eq!(
            "Very_Active".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::VeryActive
        );
    }
}
