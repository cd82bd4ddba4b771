// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the record and selection store traits.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::debug;

use civic_config::model::StorageConfig;
use civic_core::traits::{RecordStore, RecordUpsert, SelectionStore, StoredRecord};
use civic_core::types::{Collection, RegionSelection};
use civic_core::CivicError;

use crate::database::Database;
use crate::queries;

/// SQLite-backed store for reconciled records and region selections.
///
/// Every trait call is exactly one hop to the connection thread.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the database described by `config`.
    pub async fn open(config: &StorageConfig) -> Result<Self, CivicError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite store initialized");
        Ok(Self { db })
    }

    pub async fn open_in_memory() -> Result<Self, CivicError> {
        Ok(Self {
            db: Database::open_in_memory().await?,
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn close(self) -> Result<(), CivicError> {
        self.db.close().await
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn existing_external_ids(
        &self,
        collection: Collection,
    ) -> Result<HashSet<String>, CivicError> {
        queries::records::existing_external_ids(&self.db, collection).await
    }

    async fn upsert_batch(
        &self,
        collection: Collection,
        batch: Vec<RecordUpsert>,
    ) -> Result<(), CivicError> {
        queries::records::upsert_batch(&self.db, collection, batch).await
    }

    async fn count(&self, collection: Collection) -> Result<usize, CivicError> {
        queries::records::count(&self.db, collection).await
    }

    async fn find_page(
        &self,
        collection: Collection,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<StoredRecord>, CivicError> {
        queries::records::find_page(&self.db, collection, offset, limit).await
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<StoredRecord>, CivicError> {
        queries::records::find_by_id(&self.db, collection, id).await
    }
}

#[async_trait]
impl SelectionStore for SqliteStore {
    async fn find_active_local(&self) -> Result<Option<RegionSelection>, CivicError> {
        queries::selections::find_active_local(&self.db).await
    }

    async fn find_federal(&self) -> Result<Option<RegionSelection>, CivicError> {
        queries::selections::find_federal(&self.db).await
    }

    async fn upsert(&self, selection: &RegionSelection) -> Result<(), CivicError> {
        queries::selections::upsert(&self.db, selection).await
    }
}
