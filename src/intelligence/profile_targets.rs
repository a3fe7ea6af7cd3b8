// ABOUTME: Persists calculated nutrition targets into the user's profile document
// ABOUTME: Uses merge writes so fields owned by other flows survive a recalculation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::nutrition_calculator::DailyTargets;
use crate::constants::storage::{PROFILE_COLLECTION, TARGETS_DOCUMENT};
use crate::errors::AppResult;
use crate::store::{read_typed, DocumentStore, StoreKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Targets as stored on the profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTargets {
    /// Daily calorie goal (kcal)
    pub calorie_goal: u32,
    /// Protein (grams/day)
    pub protein_g: u32,
    /// Carbohydrates (grams/day)
    pub carbs_g: u32,
    /// Fat (grams/day)
    pub fat_g: u32,
    /// When the targets were calculated
    pub updated_at: DateTime<Utc>,
}

impl StoredTargets {
    /// Snapshot of calculated targets
    #[must_use]
    pub const fn from_daily(targets: &DailyTargets, updated_at: DateTime<Utc>) -> Self {
        Self {
            calorie_goal: targets.calorie_goal,
            protein_g: targets.macros.protein_g,
            carbs_g: targets.macros.carbs_g,
            fat_g: targets.macros.fat_g,
            updated_at,
        }
    }
}

/// Reads and writes the nutrition section of user profiles
#[derive(Clone)]
pub struct ProfileTargetsRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProfileTargetsRepository {
    /// Create a repository over a store
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn key(user_id: Uuid) -> StoreKey {
        StoreKey::new(user_id, PROFILE_COLLECTION, TARGETS_DOCUMENT)
    }

    /// Merge freshly calculated targets into the profile
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the store cannot be reached
    pub async fn save_targets(&self, user_id: Uuid, targets: &StoredTargets) -> AppResult<()> {
        let version = self
            .store
            .merge(&Self::key(user_id), serde_json::to_value(targets)?)
            .await
            .map_err(|e| e.with_user_id(user_id))?;
        info!(
            user_id = %user_id,
            calorie_goal = targets.calorie_goal,
            version,
            "Saved nutrition targets"
        );
        Ok(())
    }

    /// Load the stored targets, if any were saved
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the store cannot be reached, or
    /// `SerializationError` if the stored document is incomplete
    pub async fn load_targets(&self, user_id: Uuid) -> AppResult<Option<StoredTargets>> {
        Ok(read_typed(self.store.as_ref(), &Self::key(user_id))
            .await
            .map_err(|e| e.with_user_id(user_id))?
            .map(|(targets, _version)| targets))
    }
}
