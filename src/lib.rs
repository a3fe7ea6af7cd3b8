// ABOUTME: Main library entry point for the personalized nutrition and access-tier engine
// ABOUTME: Exposes the goal calculator, the access tier gate and their storage/clock seams
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Wellness Engine
//!
//! Two components used during onboarding and daily use of a wellness app:
//!
//! - **Goal calculator**: turns a biometric profile into a daily calorie goal,
//!   macronutrient targets (with diabetic-friendly splits) and a time-to-goal
//!   projection. Pure and synchronous.
//! - **Access tier gate**: decides what a guest, registered or premium user may
//!   do, including historical cutoff dates and a per-day meal logging quota
//!   persisted in a [`store::DocumentStore`].
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use uuid::Uuid;
//! use wellness_engine::access::AccessTierGate;
//! use wellness_engine::clock::SystemClock;
//! use wellness_engine::config::EngineConfig;
//! use wellness_engine::errors::AppResult;
//! use wellness_engine::intelligence::calculate_daily_targets;
//! use wellness_engine::models::{BiometricProfile, UserTier};
//! use wellness_engine::store::InMemoryDocumentStore;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let profile = BiometricProfile::from_json(
//!         r#"{"age":30,"height_cm":165,"weight_kg":70,"biological_sex":"female",
//!             "activity_level":"moderate","weight_goal":"lose"}"#,
//!     )?;
//!     let targets = calculate_daily_targets(&profile, false, &EngineConfig::global().nutrition)?;
//!     println!("{} kcal/day", targets.calorie_goal);
//!
//!     let gate = AccessTierGate::new(
//!         Arc::new(InMemoryDocumentStore::new()),
//!         Arc::new(SystemClock::local()),
//!     );
//!     let status = gate.record_meal_log(Uuid::new_v4(), UserTier::Guest).await?;
//!     println!("{} meals left today", status.remaining);
//!     Ok(())
//! }
//! ```

/// Tier-based feature gating and the daily meal logging quota
pub mod access;

/// Wall-clock and calendar-day abstraction
pub mod clock;

/// Engine configuration: nutrition coefficients and tier limits
pub mod config;

/// Application constants
pub mod constants;

/// Unified error handling
pub mod errors;

/// Nutrition goal calculations
pub mod intelligence;

/// Logging configuration
pub mod logging;

/// Domain models
pub mod models;

/// Persisted document store abstraction
pub mod store;
