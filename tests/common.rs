// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, gate construction and failing/conflicting store doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `wellness_engine`

use chrono::NaiveDate;
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Once};
use wellness_engine::access::AccessTierGate;
use wellness_engine::clock::ManualClock;
use wellness_engine::config::TierTable;
use wellness_engine::errors::{AppError, AppResult};
use wellness_engine::models::{ActivityLevel, BiologicalSex, BiometricProfile, WeightGoal};
use wellness_engine::store::{
    DocumentStore, InMemoryDocumentStore, StoreKey, VersionedDocument, WriteOutcome,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Gate over a fresh in-memory store and a clock pinned to noon UTC on `today`
pub fn gate_on(today: NaiveDate) -> (AccessTierGate, InMemoryDocumentStore, Arc<ManualClock>) {
    init_test_logging();
    let store = InMemoryDocumentStore::new();
    let clock = Arc::new(ManualClock::at_noon(today));
    let gate = AccessTierGate::with_tiers(
        Arc::new(store.clone()),
        clock.clone(),
        TierTable::default(),
    );
    (gate, store, clock)
}

/// Gate over an arbitrary store
pub fn gate_with_store(store: Arc<dyn DocumentStore>, today: NaiveDate) -> AccessTierGate {
    init_test_logging();
    AccessTierGate::with_tiers(
        store,
        Arc::new(ManualClock::at_noon(today)),
        TierTable::default(),
    )
}

pub fn profile(
    age: u32,
    height_cm: f64,
    weight_kg: f64,
    biological_sex: BiologicalSex,
    activity_level: ActivityLevel,
    weight_goal: WeightGoal,
) -> BiometricProfile {
    BiometricProfile {
        age,
        height_cm,
        weight_kg,
        biological_sex,
        activity_level,
        weight_goal,
    }
}

/// Store whose backend is always unreachable
#[derive(Default)]
pub struct FailingStore;

impl FailingStore {
    fn unavailable() -> AppError {
        AppError::storage_unavailable("document store offline")
    }
}

#[async_trait::async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, _key: &StoreKey) -> AppResult<Option<VersionedDocument>> {
        Err(Self::unavailable())
    }

    async fn set(&self, _key: &StoreKey, _value: Value) -> AppResult<u64> {
        Err(Self::unavailable())
    }

    async fn merge(&self, _key: &StoreKey, _value: Value) -> AppResult<u64> {
        Err(Self::unavailable())
    }

    async fn compare_and_set(
        &self,
        _key: &StoreKey,
        _expected_version: Option<u64>,
        _value: Value,
    ) -> AppResult<WriteOutcome> {
        Err(Self::unavailable())
    }

    async fn delete(&self, _key: &StoreKey) -> AppResult<()> {
        Err(Self::unavailable())
    }

    async fn health_check(&self) -> AppResult<()> {
        Err(Self::unavailable())
    }
}

/// Store that simulates a competing writer on the first `conflicts` conditional writes
///
/// Each simulated conflict bumps the stored version without changing the value,
/// so the caller's expected version is stale when its write arrives.
pub struct ConflictingStore {
    inner: InMemoryDocumentStore,
    conflicts: u32,
    attempts: AtomicU32,
}

impl ConflictingStore {
    pub fn new(conflicts: u32) -> Self {
        Self {
            inner: InMemoryDocumentStore::new(),
            conflicts,
            attempts: AtomicU32::new(0),
        }
    }

    pub fn inner(&self) -> &InMemoryDocumentStore {
        &self.inner
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DocumentStore for ConflictingStore {
    async fn get(&self, key: &StoreKey) -> AppResult<Option<VersionedDocument>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &StoreKey, value: Value) -> AppResult<u64> {
        self.inner.set(key, value).await
    }

    async fn merge(&self, key: &StoreKey, value: Value) -> AppResult<u64> {
        self.inner.merge(key, value).await
    }

    async fn compare_and_set(
        &self,
        key: &StoreKey,
        expected_version: Option<u64>,
        value: Value,
    ) -> AppResult<WriteOutcome> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.conflicts {
            let current = match self.inner.get(key).await? {
                Some(document) => document.value,
                None => value.clone(),
            };
            self.inner.set(key, current).await?;
        }
        self.inner.compare_and_set(key, expected_version, value).await
    }

    async fn delete(&self, key: &StoreKey) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> AppResult<()> {
        self.inner.health_check().await
    }
}
