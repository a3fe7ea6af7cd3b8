// ABOUTME: Access tier gate enforcing per-tier capabilities, day windows and daily meal quotas
// ABOUTME: Quota updates are atomic check-and-increment via versioned compare-and-set writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Access Tier Gate
//!
//! Decides what a user may do given their [`UserTier`]:
//!
//! - capability features (health sync, friends, meal plans, analytics) are on/off
//! - day-limited features expose a historical cutoff date
//! - meal logging is counted per calendar day in a persisted quota document
//!
//! The daily counter resets lazily: the first read on a new day notices the stale
//! date and rewrites the document. Increments use optimistic concurrency so two
//! devices logging at once never lose an update.

mod messages;
/// Persisted daily counter
pub mod quota;
/// Session tier holder
pub mod session;

pub use quota::{MealLogStatus, MealLoggingQuota};
pub use session::TierSession;

use crate::clock::Clock;
use crate::config::{EngineConfig, TierLimits, TierTable};
use crate::constants::storage::{MAX_WRITE_ATTEMPTS, MEAL_LOGGING_DOCUMENT, QUOTA_COLLECTION};
use crate::errors::{AppError, AppResult};
use crate::models::{Limit, TieredFeature, UserTier};
use crate::store::{DocumentStore, StoreKey, WriteOutcome};
use chrono::{Days, NaiveDate};
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Limits for a tier from the global configuration
#[must_use]
pub fn get_limits_for_tier(tier: UserTier) -> &'static TierLimits {
    EngineConfig::global().tiers.limits(tier)
}

/// Tier-based access decisions backed by a document store and a clock
#[derive(Clone)]
pub struct AccessTierGate {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    tiers: TierTable,
}

impl AccessTierGate {
    /// Create a gate using the globally configured tier table
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_tiers(store, clock, EngineConfig::global().tiers.clone())
    }

    /// Create a gate with an explicit tier table
    #[must_use]
    pub fn with_tiers(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>, tiers: TierTable) -> Self {
        Self {
            store,
            clock,
            tiers,
        }
    }

    /// Limits for a tier
    #[must_use]
    pub const fn get_limits_for_tier(&self, tier: UserTier) -> &TierLimits {
        self.tiers.limits(tier)
    }

    /// Whether a feature is available at all for a tier
    #[must_use]
    pub const fn is_feature_enabled(&self, feature: TieredFeature, tier: UserTier) -> bool {
        self.tiers.limits(tier).is_enabled(feature)
    }

    /// Earliest visible day for a day-limited feature
    ///
    /// Returns `None` when the window is unlimited or the feature is not day-limited.
    #[must_use]
    pub fn get_cutoff_date(&self, feature: TieredFeature, tier: UserTier) -> Option<NaiveDate> {
        let days = self.tiers.limits(tier).day_limit(feature)?.finite()?;
        self.clock
            .today()
            .checked_sub_days(Days::new(u64::from(days)))
    }

    /// Upgrade prompt for a feature at a tier
    #[must_use]
    pub fn get_upgrade_message(&self, feature: TieredFeature, tier: UserTier) -> String {
        messages::upgrade_message(&self.tiers, feature, tier)
    }

    /// Upgrade prompt for a feature named by key; unknown keys get a generic prompt
    #[must_use]
    pub fn upgrade_message_for_key(&self, feature_key: &str, tier: UserTier) -> String {
        feature_key.parse::<TieredFeature>().map_or_else(
            |_| messages::generic_upgrade_message(tier),
            |feature| self.get_upgrade_message(feature, tier),
        )
    }

    fn quota_key(user_id: Uuid) -> StoreKey {
        StoreKey::new(user_id, QUOTA_COLLECTION, MEAL_LOGGING_DOCUMENT)
    }

    /// Read the counter and the version it was read at
    ///
    /// A body that no longer decodes yields no counter but keeps its version, so
    /// callers overwrite it the same way they reset a stale day.
    async fn read_quota(
        &self,
        key: &StoreKey,
    ) -> AppResult<(Option<MealLoggingQuota>, Option<u64>)> {
        let Some(document) = self
            .store
            .get(key)
            .await
            .map_err(|e| e.with_user_id(key.user_id))?
        else {
            return Ok((None, None));
        };

        match serde_json::from_value::<MealLoggingQuota>(document.value) {
            Ok(quota) => Ok((Some(quota), Some(document.version))),
            Err(e) => {
                warn!(
                    user_id = %key.user_id,
                    version = document.version,
                    error = %e,
                    "Undecodable meal logging quota, treating it as stale"
                );
                Ok((None, Some(document.version)))
            }
        }
    }

    async fn write_quota(
        &self,
        key: &StoreKey,
        expected_version: Option<u64>,
        quota: &MealLoggingQuota,
    ) -> AppResult<WriteOutcome> {
        self.store
            .compare_and_set(key, expected_version, serde_json::to_value(quota)?)
            .await
            .map_err(|e| e.with_user_id(key.user_id))
    }

    /// Check whether the user may log a meal now
    ///
    /// Unlimited tiers never touch the store. Otherwise the first check on a new
    /// calendar day persists the reset counter.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the store cannot be reached, or
    /// `ConcurrentUpdateConflict` if the reset keeps losing to concurrent writers
    pub async fn can_log_meal(&self, user_id: Uuid, tier: UserTier) -> AppResult<MealLogStatus> {
        let limit = self.tiers.limits(tier).meal_logging_per_day;
        if limit.is_unlimited() {
            return Ok(MealLogStatus::unlimited());
        }

        let key = Self::quota_key(user_id);
        let today = self.clock.today();

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let (stored, version) = self.read_quota(&key).await?;
            if let Some(quota) = stored.filter(|quota| !quota.is_stale(today)) {
                return Ok(MealLogStatus::from(&quota.for_day(today, limit)));
            }

            let fresh = MealLoggingQuota::fresh(today, limit);
            debug!(
                user_id = %user_id,
                previous_date = ?stored.map(|quota| quota.date),
                %today,
                "Resetting daily meal logging quota"
            );
            if self.write_quota(&key, version, &fresh).await?.is_written() {
                return Ok(MealLogStatus::from(&fresh));
            }
            warn!(user_id = %user_id, attempt, "Quota reset raced a concurrent write");
        }

        Err(AppError::concurrent_update(key.to_string()).with_user_id(user_id))
    }

    /// Count one logged meal against today's quota
    ///
    /// Unlimited tiers are not counted.
    ///
    /// # Errors
    ///
    /// Returns `QuotaExceeded` when the daily limit is already reached,
    /// `StorageUnavailable` if the store cannot be reached, or
    /// `ConcurrentUpdateConflict` when the retry also loses to a concurrent writer
    pub async fn record_meal_log(&self, user_id: Uuid, tier: UserTier) -> AppResult<MealLogStatus> {
        let limit = self.tiers.limits(tier).meal_logging_per_day;
        let Limit::Limited(max) = limit else {
            return Ok(MealLogStatus::unlimited());
        };

        let key = Self::quota_key(user_id);
        let today = self.clock.today();

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let (stored, version) = self.read_quota(&key).await?;
            let quota = match stored {
                Some(stored) => {
                    if stored.is_stale(today) {
                        debug!(user_id = %user_id, previous_date = %stored.date, %today, "Meal logging quota rolled over");
                    }
                    stored.for_day(today, limit)
                }
                None => MealLoggingQuota::fresh(today, limit),
            };

            if !quota.has_capacity() {
                debug!(user_id = %user_id, tier = %tier, count = quota.count, "Meal logging quota exhausted");
                return Err(AppError::quota_exceeded(max).with_user_id(user_id));
            }

            let next = quota.incremented();
            match self.write_quota(&key, version, &next).await? {
                WriteOutcome::Written { version } => {
                    debug!(user_id = %user_id, count = next.count, version, "Meal logged");
                    return Ok(MealLogStatus::from(&next));
                }
                WriteOutcome::VersionMismatch { current } => {
                    warn!(
                        user_id = %user_id,
                        attempt,
                        expected = ?version,
                        current = ?current,
                        "Meal logging quota changed concurrently, retrying"
                    );
                }
            }
        }

        Err(AppError::concurrent_update(key.to_string()).with_user_id(user_id))
    }

    /// Fail-safe form of [`Self::can_log_meal`]
    ///
    /// Storage or conflict errors are logged and reported as a denial.
    pub async fn meal_logging_status(&self, user_id: Uuid, tier: UserTier) -> MealLogStatus {
        match self.can_log_meal(user_id, tier).await {
            Ok(status) => status,
            Err(e) => {
                error!(user_id = %user_id, tier = %tier, error = %e, "Meal logging check failed, denying");
                MealLogStatus::denied(self.tiers.limits(tier).meal_logging_per_day)
            }
        }
    }

    /// Check store connectivity
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the store cannot be reached
    pub async fn health_check(&self) -> AppResult<()> {
        self.store.health_check().await
    }
}
