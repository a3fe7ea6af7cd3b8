// ABOUTME: Upgrade prompts shown when a feature is limited for the caller's tier
// ABOUTME: Derived from the tier table so the wording always matches the enforced limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::{FeatureGate, TierTable};
use crate::models::{Limit, TieredFeature, UserTier};

const fn feature_title(feature: TieredFeature) -> &'static str {
    match feature {
        TieredFeature::MealLogging => "Meal logging",
        TieredFeature::MealHistory => "Meal history",
        TieredFeature::CycleTracking => "Cycle tracking",
        TieredFeature::MealRecommendations => "Meal recommendations",
        TieredFeature::HealthSync => "Health sync",
        TieredFeature::Friends => "Friends",
        TieredFeature::MealPlans => "Meal plans",
        TieredFeature::Analytics => "Analytics",
    }
}

const fn tier_title(tier: UserTier) -> &'static str {
    match tier {
        UserTier::Guest => "Guest",
        UserTier::Registered => "Free account",
        UserTier::Premium => "Premium",
    }
}

const fn call_to_action(target: UserTier) -> &'static str {
    match target {
        UserTier::Guest | UserTier::Registered => "Create a free account",
        UserTier::Premium => "Upgrade to Premium",
    }
}

fn days(limit: Limit) -> String {
    match limit {
        Limit::Limited(1) => "1 day".to_owned(),
        Limit::Limited(n) => format!("{n} days"),
        Limit::Unlimited => "your full history".to_owned(),
    }
}

fn meals(limit: Limit) -> String {
    match limit {
        Limit::Limited(1) => "1 meal per day".to_owned(),
        Limit::Limited(n) => format!("{n} meals per day"),
        Limit::Unlimited => "unlimited meals".to_owned(),
    }
}

/// First tier above `tier` that grants strictly more of `feature`
fn upgrade_target(table: &TierTable, feature: TieredFeature, tier: UserTier) -> Option<UserTier> {
    let current = table.limits(tier).gate(feature);
    UserTier::ALL
        .into_iter()
        .filter(|candidate| *candidate > tier)
        .find(|candidate| {
            let gate = table.limits(*candidate).gate(feature);
            gate != current && gate.covers(current)
        })
}

pub(super) fn upgrade_message(table: &TierTable, feature: TieredFeature, tier: UserTier) -> String {
    let title = feature_title(feature);
    let Some(target) = upgrade_target(table, feature, tier) else {
        return format!("You have full access to {} on your plan.", title.to_lowercase());
    };
    let action = call_to_action(target);
    let current = tier_title(tier);

    match (
        table.limits(tier).gate(feature),
        table.limits(target).gate(feature),
    ) {
        (FeatureGate::Days(limit), FeatureGate::Days(upgraded)) => format!(
            "{current} users can see {} of {}. {action} to see {}.",
            days(limit),
            title.to_lowercase(),
            days(upgraded)
        ),
        (FeatureGate::DailyQuota(limit), FeatureGate::DailyQuota(upgraded)) => format!(
            "{current} users can log {}. {action} to log {}.",
            meals(limit),
            meals(upgraded)
        ),
        _ => format!("{title} is not available on your plan. {action} to unlock it."),
    }
}

pub(super) fn generic_upgrade_message(tier: UserTier) -> String {
    tier.next().map_or_else(
        || "You have access to every feature.".to_owned(),
        |target| format!("{} to unlock more features.", call_to_action(target)),
    )
}
