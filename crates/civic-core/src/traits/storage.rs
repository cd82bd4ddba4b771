// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage collaborator traits used by the sync engine and bootstrap.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::CivicError;
use crate::types::{Collection, RegionSelection};

/// One upsert inside a batch, keyed by `external_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordUpsert {
    pub external_id: String,
    pub payload: Value,
}

/// A row as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub external_id: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persistence for reconciled civic records.
///
/// Reconciliation only needs `existing_external_ids` and `upsert_batch`;
/// each call is one storage round trip.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// External ids of every persisted record in the collection.
    async fn existing_external_ids(&self, collection: Collection)
    -> Result<HashSet<String>, CivicError>;

    /// Apply all upserts in one transaction, in order. Existing rows keep
    /// their id and creation time.
    async fn upsert_batch(
        &self,
        collection: Collection,
        batch: Vec<RecordUpsert>,
    ) -> Result<(), CivicError>;

    async fn count(&self, collection: Collection) -> Result<usize, CivicError>;

    /// Rows in insertion order.
    async fn find_page(
        &self,
        collection: Collection,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<StoredRecord>, CivicError>;

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<StoredRecord>, CivicError>;
}

/// Persistence for operator region selections. Touched at startup only.
#[async_trait]
pub trait SelectionStore: Send + Sync {
    /// The active local selection, if any.
    async fn find_active_local(&self) -> Result<Option<RegionSelection>, CivicError>;

    /// The federal singleton, if any.
    async fn find_federal(&self) -> Result<Option<RegionSelection>, CivicError>;

    /// Insert or replace a selection. Activating a local selection
    /// deactivates any other.
    async fn upsert(&self, selection: &RegionSelection) -> Result<(), CivicError>;
}
