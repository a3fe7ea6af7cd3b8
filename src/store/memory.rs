// ABOUTME: In-memory document store with per-document versions and atomic conditional writes
// ABOUTME: Serves single-process hosts and tests; every write runs under one write lock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{merge_values, DocumentStore, StoreKey, VersionedDocument, WriteOutcome};
use crate::errors::AppResult;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory document store
///
/// Uses `Arc<RwLock<HashMap>>` so clones share the same documents. Conditional
/// writes compare and replace under the write lock, which makes them atomic
/// with respect to every other operation on the store.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<String, VersionedDocument>>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store holds no documents
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    fn write_locked(
        documents: &mut HashMap<String, VersionedDocument>,
        key: String,
        value: Value,
    ) -> u64 {
        let version = documents.get(&key).map_or(1, |doc| doc.version + 1);
        documents.insert(key, VersionedDocument { value, version });
        version
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, key: &StoreKey) -> AppResult<Option<VersionedDocument>> {
        Ok(self.documents.read().await.get(&key.to_string()).cloned())
    }

    async fn set(&self, key: &StoreKey, value: Value) -> AppResult<u64> {
        let mut documents = self.documents.write().await;
        Ok(Self::write_locked(&mut documents, key.to_string(), value))
    }

    async fn merge(&self, key: &StoreKey, value: Value) -> AppResult<u64> {
        let path = key.to_string();
        let mut documents = self.documents.write().await;
        let existing = documents.get(&path).map(|doc| doc.value.clone());
        let merged = merge_values(existing, value);
        Ok(Self::write_locked(&mut documents, path, merged))
    }

    async fn compare_and_set(
        &self,
        key: &StoreKey,
        expected_version: Option<u64>,
        value: Value,
    ) -> AppResult<WriteOutcome> {
        let path = key.to_string();
        let mut documents = self.documents.write().await;
        let current = documents.get(&path).map(|doc| doc.version);
        if current != expected_version {
            return Ok(WriteOutcome::VersionMismatch { current });
        }
        let version = Self::write_locked(&mut documents, path, value);
        Ok(WriteOutcome::Written { version })
    }

    async fn delete(&self, key: &StoreKey) -> AppResult<()> {
        self.documents.write().await.remove(&key.to_string());
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}
