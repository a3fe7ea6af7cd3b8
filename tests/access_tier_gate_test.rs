// ABOUTME: Integration tests for the access tier gate and the persisted daily meal quota
// ABOUTME: Covers rollover, exhaustion, cutoff dates, fail-safe storage errors and write conflicts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use common::{date, gate_on, gate_with_store, ConflictingStore, FailingStore};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use wellness_engine::{
    access::{get_limits_for_tier, MealLogStatus, MealLoggingQuota, TierSession},
    config::TierTable,
    constants::storage::{MEAL_LOGGING_DOCUMENT, QUOTA_COLLECTION},
    errors::ErrorCode,
    models::{Limit, TieredFeature, UserTier},
    store::{DocumentStore, InMemoryDocumentStore, StoreKey},
};

mod common;

fn quota_key(user_id: Uuid) -> StoreKey {
    StoreKey::new(user_id, QUOTA_COLLECTION, MEAL_LOGGING_DOCUMENT)
}

async fn stored_quota(store: &InMemoryDocumentStore, user_id: Uuid) -> MealLoggingQuota {
    let document = store.get(&quota_key(user_id)).await.unwrap().unwrap();
    serde_json::from_value(document.value).unwrap()
}

// ============================================================================
// DAILY MEAL QUOTA
// ============================================================================

#[tokio::test]
async fn test_stale_quota_resets_on_first_check_of_the_day() {
    let today = date(2025, 3, 10);
    let (gate, store, _clock) = gate_on(today);
    let user_id = Uuid::new_v4();
    store
        .set(
            &quota_key(user_id),
            json!({"date": "2025-03-09", "count": 3, "limit": 3}),
        )
        .await
        .unwrap();

    let status = gate.can_log_meal(user_id, UserTier::Guest).await.unwrap();
    assert_eq!(
        status,
        MealLogStatus {
            allowed: true,
            remaining: Limit::Limited(3),
            limit: Limit::Limited(3),
        }
    );

    let persisted = stored_quota(&store, user_id).await;
    assert_eq!(persisted, MealLoggingQuota::fresh(today, Limit::Limited(3)));
}

#[tokio::test]
async fn test_undecodable_quota_is_reset_like_a_stale_day() {
    let today = date(2025, 3, 10);
    let (gate, store, _clock) = gate_on(today);
    let user_id = Uuid::new_v4();
    store
        .set(
            &quota_key(user_id),
            json!({"date": "Sun Mar 09 2025", "count": 3, "limit": 3}),
        )
        .await
        .unwrap();

    let status = gate.can_log_meal(user_id, UserTier::Guest).await.unwrap();
    assert!(status.allowed);
    assert_eq!(status.remaining, Limit::Limited(3));

    let document = store.get(&quota_key(user_id)).await.unwrap().unwrap();
    assert_eq!(document.version, 2);
    assert_eq!(
        stored_quota(&store, user_id).await,
        MealLoggingQuota::fresh(today, Limit::Limited(3))
    );
}

#[tokio::test]
async fn test_record_overwrites_undecodable_quota() {
    let (gate, store, _clock) = gate_on(date(2025, 3, 10));
    let user_id = Uuid::new_v4();
    store
        .set(&quota_key(user_id), json!({"date": "2025-03-10", "count": -1}))
        .await
        .unwrap();

    let status = gate.record_meal_log(user_id, UserTier::Guest).await.unwrap();
    assert_eq!(status.remaining, Limit::Limited(2));
    assert_eq!(stored_quota(&store, user_id).await.count, 1);

    let status = gate.meal_logging_status(user_id, UserTier::Guest).await;
    assert!(status.allowed);
}

#[tokio::test]
async fn test_reset_is_persisted_once_per_day() {
    let (gate, store, _clock) = gate_on(date(2025, 3, 10));
    let user_id = Uuid::new_v4();

    gate.can_log_meal(user_id, UserTier::Guest).await.unwrap();
    gate.can_log_meal(user_id, UserTier::Guest).await.unwrap();

    let document = store.get(&quota_key(user_id)).await.unwrap().unwrap();
    assert_eq!(document.version, 1);
}

#[tokio::test]
async fn test_guest_can_log_three_meals_then_is_denied() {
    let (gate, store, _clock) = gate_on(date(2025, 3, 10));
    let user_id = Uuid::new_v4();

    for expected_remaining in [2, 1, 0] {
        let status = gate.record_meal_log(user_id, UserTier::Guest).await.unwrap();
        assert_eq!(status.remaining, Limit::Limited(expected_remaining));
    }

    let error = gate
        .record_meal_log(user_id, UserTier::Guest)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::QuotaExceeded);
    assert_eq!(error.context.user_id, Some(user_id));

    let status = gate.can_log_meal(user_id, UserTier::Guest).await.unwrap();
    assert!(!status.allowed);
    assert_eq!(status.remaining, Limit::Limited(0));
    assert_eq!(stored_quota(&store, user_id).await.count, 3);
}

#[tokio::test]
async fn test_quota_rolls_over_at_midnight() {
    let (gate, _store, clock) = gate_on(date(2025, 3, 10));
    let user_id = Uuid::new_v4();
    for _ in 0..3 {
        gate.record_meal_log(user_id, UserTier::Guest).await.unwrap();
    }
    assert!(!gate.can_log_meal(user_id, UserTier::Guest).await.unwrap().allowed);

    clock.advance_days(1);

    let status = gate.record_meal_log(user_id, UserTier::Guest).await.unwrap();
    assert_eq!(status.remaining, Limit::Limited(2));
}

#[tokio::test]
async fn test_registered_users_get_ten_meals_per_day() {
    let (gate, _store, _clock) = gate_on(date(2025, 3, 10));
    let user_id = Uuid::new_v4();

    let status = gate.can_log_meal(user_id, UserTier::Registered).await.unwrap();
    assert_eq!(status.limit, Limit::Limited(10));
    assert_eq!(status.remaining, Limit::Limited(10));
}

#[tokio::test]
async fn test_upgrade_mid_day_keeps_count_and_raises_limit() {
    let (gate, _store, _clock) = gate_on(date(2025, 3, 10));
    let user_id = Uuid::new_v4();
    for _ in 0..3 {
        gate.record_meal_log(user_id, UserTier::Guest).await.unwrap();
    }

    let status = gate.record_meal_log(user_id, UserTier::Registered).await.unwrap();
    assert_eq!(status.remaining, Limit::Limited(6));
}

#[tokio::test]
async fn test_premium_is_unlimited_and_never_counted() {
    let (gate, store, _clock) = gate_on(date(2025, 3, 10));
    let user_id = Uuid::new_v4();

    for _ in 0..50 {
        let status = gate.record_meal_log(user_id, UserTier::Premium).await.unwrap();
        assert_eq!(status, MealLogStatus::unlimited());
    }
    let status = gate.can_log_meal(user_id, UserTier::Premium).await.unwrap();
    assert!(status.allowed);
    assert_eq!(status.remaining.as_i64(), -1);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_users_have_independent_quotas() {
    let (gate, _store, _clock) = gate_on(date(2025, 3, 10));
    let (first, second) = (Uuid::new_v4(), Uuid::new_v4());
    for _ in 0..3 {
        gate.record_meal_log(first, UserTier::Guest).await.unwrap();
    }
    let status = gate.can_log_meal(second, UserTier::Guest).await.unwrap();
    assert_eq!(status.remaining, Limit::Limited(3));
}

// ============================================================================
// STORAGE FAILURES AND CONFLICTS
// ============================================================================

#[tokio::test]
async fn test_storage_failure_denies_meal_logging() {
    let gate = gate_with_store(Arc::new(FailingStore), date(2025, 3, 10));
    let user_id = Uuid::new_v4();

    let error = gate.can_log_meal(user_id, UserTier::Guest).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::StorageUnavailable);
    assert_eq!(error.context.user_id, Some(user_id));

    let error = gate
        .record_meal_log(user_id, UserTier::Registered)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::StorageUnavailable);

    let status = gate.meal_logging_status(user_id, UserTier::Guest).await;
    assert!(!status.allowed);
    assert_eq!(status.remaining, Limit::Limited(0));
    assert!(gate.health_check().await.is_err());
}

#[tokio::test]
async fn test_storage_failure_does_not_affect_unlimited_tier() {
    let gate = gate_with_store(Arc::new(FailingStore), date(2025, 3, 10));
    let status = gate.meal_logging_status(Uuid::new_v4(), UserTier::Premium).await;
    assert!(status.allowed);
}

#[tokio::test]
async fn test_single_conflict_is_retried() {
    let today = date(2025, 3, 10);
    let store = Arc::new(ConflictingStore::new(1));
    let user_id = Uuid::new_v4();
    store
        .inner()
        .set(
            &quota_key(user_id),
            serde_json::to_value(MealLoggingQuota::fresh(today, Limit::Limited(3))).unwrap(),
        )
        .await
        .unwrap();
    let gate = gate_with_store(store.clone(), today);

    let status = gate.record_meal_log(user_id, UserTier::Guest).await.unwrap();
    assert_eq!(status.remaining, Limit::Limited(2));
    assert_eq!(store.attempts(), 2);
    assert_eq!(stored_quota(store.inner(), user_id).await.count, 1);
}

#[tokio::test]
async fn test_repeated_conflict_surfaces_error() {
    let today = date(2025, 3, 10);
    let store = Arc::new(ConflictingStore::new(2));
    let user_id = Uuid::new_v4();
    store
        .inner()
        .set(
            &quota_key(user_id),
            serde_json::to_value(MealLoggingQuota::fresh(today, Limit::Limited(3))).unwrap(),
        )
        .await
        .unwrap();
    let gate = gate_with_store(store.clone(), today);

    let error = gate
        .record_meal_log(user_id, UserTier::Guest)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ConcurrentUpdateConflict);
    assert!(error.is_retryable());
    assert_eq!(store.attempts(), 2);
    assert_eq!(stored_quota(store.inner(), user_id).await.count, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_logging_never_loses_updates() {
    let (gate, store, _clock) = gate_on(date(2025, 3, 10));
    let user_id = Uuid::new_v4();

    let handles: Vec<_> = (0..24)
        .map(|_| {
            let gate = gate.clone();
            tokio::spawn(async move { gate.record_meal_log(user_id, UserTier::Registered).await })
        })
        .collect();

    let mut successes = 0_u32;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(error) => assert!(
                matches!(
                    error.code,
                    ErrorCode::QuotaExceeded | ErrorCode::ConcurrentUpdateConflict
                ),
                "unexpected error: {error}"
            ),
        }
    }

    assert!(successes >= 1);
    assert!(successes <= 10);
    assert_eq!(stored_quota(&store, user_id).await.count, successes);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rollover_reset_racing_meal_logs_keeps_every_count() {
    let today = date(2025, 3, 10);
    let (gate, store, _clock) = gate_on(today);
    let user_id = Uuid::new_v4();
    store
        .set(
            &quota_key(user_id),
            json!({"date": "2025-03-09", "count": 10, "limit": 10}),
        )
        .await
        .unwrap();

    let checks: Vec<_> = (0..8)
        .map(|_| {
            let gate = gate.clone();
            tokio::spawn(async move { gate.can_log_meal(user_id, UserTier::Registered).await })
        })
        .collect();
    let logs: Vec<_> = (0..8)
        .map(|_| {
            let gate = gate.clone();
            tokio::spawn(async move { gate.record_meal_log(user_id, UserTier::Registered).await })
        })
        .collect();

    for handle in checks {
        match handle.await.unwrap() {
            Ok(status) => assert!(status.allowed),
            Err(error) => assert_eq!(error.code, ErrorCode::ConcurrentUpdateConflict),
        }
    }

    let mut logged = 0_u32;
    for handle in logs {
        match handle.await.unwrap() {
            Ok(_) => logged += 1,
            Err(error) => assert_eq!(
                error.code,
                ErrorCode::ConcurrentUpdateConflict,
                "unexpected error: {error}"
            ),
        }
    }

    assert!(logged >= 1);
    let persisted = stored_quota(&store, user_id).await;
    assert_eq!(persisted.date, today);
    assert_eq!(persisted.count, logged);
}

// ============================================================================
// CUTOFF DATES AND FEATURE FLAGS
// ============================================================================

#[test]
fn test_cutoff_dates_follow_day_limits() {
    let (gate, _store, _clock) = gate_on(date(2025, 3, 10));

    assert_eq!(
        gate.get_cutoff_date(TieredFeature::MealHistory, UserTier::Guest),
        Some(date(2025, 3, 7))
    );
    assert_eq!(
        gate.get_cutoff_date(TieredFeature::MealHistory, UserTier::Registered),
        Some(date(2025, 2, 8))
    );
    assert_eq!(
        gate.get_cutoff_date(TieredFeature::CycleTracking, UserTier::Guest),
        Some(date(2025, 3, 3))
    );
    assert_eq!(
        gate.get_cutoff_date(TieredFeature::MealHistory, UserTier::Premium),
        None
    );
}

#[test]
fn test_cutoff_date_absent_for_non_day_limited_features() {
    let (gate, _store, _clock) = gate_on(date(2025, 3, 10));
    for tier in UserTier::ALL {
        assert_eq!(gate.get_cutoff_date(TieredFeature::HealthSync, tier), None);
        assert_eq!(gate.get_cutoff_date(TieredFeature::MealLogging, tier), None);
    }
}

#[test]
fn test_cutoff_date_tracks_the_clock() {
    let (gate, _store, clock) = gate_on(date(2025, 3, 10));
    clock.advance_days(5);
    assert_eq!(
        gate.get_cutoff_date(TieredFeature::MealHistory, UserTier::Guest),
        Some(date(2025, 3, 12))
    );
}

#[test]
fn test_feature_flags_per_tier() {
    let (gate, _store, _clock) = gate_on(date(2025, 3, 10));

    assert!(!gate.is_feature_enabled(TieredFeature::HealthSync, UserTier::Guest));
    assert!(gate.is_feature_enabled(TieredFeature::HealthSync, UserTier::Registered));
    assert!(gate.is_feature_enabled(TieredFeature::Friends, UserTier::Registered));
    assert!(!gate.is_feature_enabled(TieredFeature::MealPlans, UserTier::Registered));
    assert!(!gate.is_feature_enabled(TieredFeature::Analytics, UserTier::Registered));
    assert!(gate.is_feature_enabled(TieredFeature::MealHistory, UserTier::Guest));
    for feature in TieredFeature::ALL {
        assert!(gate.is_feature_enabled(feature, UserTier::Premium), "{feature}");
    }
}

#[test]
fn test_global_limits_match_default_table() {
    let table = TierTable::default();
    for tier in UserTier::ALL {
        assert_eq!(get_limits_for_tier(tier), table.limits(tier));
    }
}

// ============================================================================
// UPGRADE MESSAGES
// ============================================================================

#[test]
fn test_upgrade_messages_are_deterministic() {
    let (gate, _store, _clock) = gate_on(date(2025, 3, 10));
    for tier in UserTier::ALL {
        for feature in TieredFeature::ALL {
            let message = gate.get_upgrade_message(feature, tier);
            assert!(!message.is_empty());
            assert_eq!(message, gate.get_upgrade_message(feature, tier));
        }
    }
}

#[test]
fn test_meal_logging_upgrade_message() {
    let (gate, _store, _clock) = gate_on(date(2025, 3, 10));
    assert_eq!(
        gate.get_upgrade_message(TieredFeature::MealLogging, UserTier::Guest),
        "Guest users can log 3 meals per day. Create a free account to log 10 meals per day."
    );
    assert_eq!(
        gate.get_upgrade_message(TieredFeature::MealLogging, UserTier::Registered),
        "Free account users can log 10 meals per day. Upgrade to Premium to log unlimited meals."
    );
}

#[test]
fn test_unknown_feature_key_gets_generic_message() {
    let (gate, _store, _clock) = gate_on(date(2025, 3, 10));
    assert_eq!(
        gate.upgrade_message_for_key("teleportation", UserTier::Guest),
        "Create a free account to unlock more features."
    );
    assert_eq!(
        gate.upgrade_message_for_key("teleportation", UserTier::Premium),
        "You have access to every feature."
    );
    assert_eq!(
        gate.upgrade_message_for_key("meal_history", UserTier::Guest),
        gate.get_upgrade_message(TieredFeature::MealHistory, UserTier::Guest)
    );
}

// ============================================================================
// SESSION TIER
// ============================================================================

#[test]
fn test_set_user_tier_is_idempotent() {
    let session = TierSession::default();
    assert_eq!(session.current_tier(), UserTier::Guest);

    session.set_user_tier(UserTier::Registered);
    session.set_user_tier(UserTier::Registered);
    assert_eq!(session.current_tier(), UserTier::Registered);

    session.set_user_tier(UserTier::Guest);
    session.set_user_tier(UserTier::Premium);
    assert_eq!(session.current_tier(), UserTier::Premium);
}

#[test]
fn test_auth_changes_reassign_tier() {
    let session = TierSession::from_auth_state(false);
    assert_eq!(session.current_tier(), UserTier::Guest);
    assert_eq!(session.on_auth_state_changed(true), UserTier::Registered);
    assert_eq!(session.on_auth_state_changed(false), UserTier::Guest);
}
