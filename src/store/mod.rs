// ABOUTME: Document store abstraction consumed by the access tier gate and profile targets
// ABOUTME: Versioned get/set/merge plus compare-and-set for optimistic concurrency
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Persisted key-value/document store.
//!
//! Backends hold one JSON document per [`StoreKey`]. Every successful write
//! bumps the document version, which is what [`DocumentStore::compare_and_set`]
//! checks to turn read-modify-write sequences into atomic updates.

/// In-memory store implementation
pub mod memory;

pub use memory::InMemoryDocumentStore;

use crate::errors::AppResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Per-user document address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreKey {
    /// Owning user
    pub user_id: Uuid,
    /// Collection name
    pub collection: &'static str,
    /// Document name within the collection
    pub document: &'static str,
}

impl StoreKey {
    /// Create a key
    #[must_use]
    pub const fn new(user_id: Uuid, collection: &'static str, document: &'static str) -> Self {
        Self {
            user_id,
            collection,
            document,
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "users/{}/{}/{}",
            self.user_id, self.collection, self.document
        )
    }
}

/// Stored document with its version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedDocument {
    /// Document body
    pub value: Value,
    /// Incremented on every write, starting at 1
    pub version: u64,
}

/// Result of a conditional write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Precondition held and the document was written
    Written {
        /// New version
        version: u64,
    },
    /// Stored version differed from the expected one; nothing was written
    VersionMismatch {
        /// Version currently stored, `None` if the document is absent
        current: Option<u64>,
    },
}

impl WriteOutcome {
    /// Whether the write was applied
    #[must_use]
    pub const fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Store provider trait for pluggable backend implementations
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the backend cannot be reached
    async fn get(&self, key: &StoreKey) -> AppResult<Option<VersionedDocument>>;

    /// Replace a document unconditionally, returning the new version
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the backend cannot be reached
    async fn set(&self, key: &StoreKey, value: Value) -> AppResult<u64>;

    /// Shallow-merge object fields into a document, creating it if absent
    ///
    /// Non-object values replace the stored document.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the backend cannot be reached
    async fn merge(&self, key: &StoreKey, value: Value) -> AppResult<u64>;

    /// Write only if the stored version equals `expected_version`
    ///
    /// `None` expects the document to be absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the backend cannot be reached
    async fn compare_and_set(
        &self,
        key: &StoreKey,
        expected_version: Option<u64>,
        value: Value,
    ) -> AppResult<WriteOutcome>;

    /// Remove a document
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the backend cannot be reached
    async fn delete(&self, key: &StoreKey) -> AppResult<()>;

    /// Verify the backend is reachable
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the backend cannot be reached
    async fn health_check(&self) -> AppResult<()>;
}

/// Read and decode a typed document with its version
///
/// # Errors
///
/// Propagates store errors; returns `SerializationError` if the body does not decode
pub async fn read_typed<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    key: &StoreKey,
) -> AppResult<Option<(T, u64)>> {
    match store.get(key).await? {
        Some(document) => {
            let decoded = serde_json::from_value(document.value)?;
            Ok(Some((decoded, document.version)))
        }
        None => Ok(None),
    }
}

/// Shallow merge used by backends implementing `merge`
pub(crate) fn merge_values(existing: Option<Value>, incoming: Value) -> Value {
    match (existing, incoming) {
        (Some(Value::Object(mut stored)), Value::Object(fields)) => {
            stored.extend(fields);
            Value::Object(stored)
        }
        (_, incoming) => incoming,
    }
}
