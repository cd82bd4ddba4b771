// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory record and selection stores that count their round trips.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use civic_core::traits::{RecordStore, RecordUpsert, SelectionStore, StoredRecord};
use civic_core::types::{Collection, RegionSelection, Slot};
use civic_core::CivicError;

/// Record store backed by insertion-ordered vectors.
///
/// `lookups()` counts `existing_external_ids` calls and `writes()` counts
/// `upsert_batch` calls, so tests can assert round trips exactly.
#[derive(Default)]
pub struct MemoryRecordStore {
    rows: Mutex<HashMap<Collection, Vec<StoredRecord>>>,
    lookups: AtomicUsize,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn round_trips(&self) -> usize {
        self.lookups() + self.writes()
    }

    pub fn reset_counters(&self) {
        self.lookups.store(0, Ordering::SeqCst);
        self.writes.store(0, Ordering::SeqCst);
    }

    /// Make every later `upsert_batch` fail without writing.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn rows(&self, collection: Collection) -> Vec<StoredRecord> {
        self.rows
            .lock()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn existing_external_ids(
        &self,
        collection: Collection,
    ) -> Result<HashSet<String>, CivicError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .await
            .get(&collection)
            .map(|rows| rows.iter().map(|r| r.external_id.clone()).collect())
            .unwrap_or_default())
    }

    async fn upsert_batch(
        &self,
        collection: Collection,
        batch: Vec<RecordUpsert>,
    ) -> Result<(), CivicError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CivicError::Storage {
                source: "injected write failure".into(),
            });
        }

        let mut rows = self.rows.lock().await;
        let rows = rows.entry(collection).or_default();
        let now = Utc::now();
        for upsert in batch {
            match rows.iter_mut().find(|r| r.external_id == upsert.external_id) {
                Some(existing) => {
                    existing.payload = upsert.payload;
                    existing.updated_at = now;
                }
                None => rows.push(StoredRecord {
                    id: uuid::Uuid::new_v4().to_string(),
                    external_id: upsert.external_id,
                    payload: upsert.payload,
                    created_at: now,
                    updated_at: now,
                }),
            }
        }
        Ok(())
    }

    async fn count(&self, collection: Collection) -> Result<usize, CivicError> {
        Ok(self.rows(collection).await.len())
    }

    async fn find_page(
        &self,
        collection: Collection,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<StoredRecord>, CivicError> {
        Ok(self
            .rows(collection)
            .await
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<StoredRecord>, CivicError> {
        Ok(self.rows(collection).await.into_iter().find(|r| r.id == id))
    }
}

/// Selection store holding selections in a vector.
#[derive(Default)]
pub struct MemorySelectionStore {
    selections: Mutex<Vec<RegionSelection>>,
}

impl MemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<RegionSelection> {
        self.selections.lock().await.clone()
    }
}

#[async_trait]
impl SelectionStore for MemorySelectionStore {
    async fn find_active_local(&self) -> Result<Option<RegionSelection>, CivicError> {
        Ok(self
            .selections
            .lock()
            .await
            .iter()
            .find(|s| s.slot == Slot::Local && s.active)
            .cloned())
    }

    async fn find_federal(&self) -> Result<Option<RegionSelection>, CivicError> {
        Ok(self
            .selections
            .lock()
            .await
            .iter()
            .find(|s| s.slot == Slot::Federal)
            .cloned())
    }

    async fn upsert(&self, selection: &RegionSelection) -> Result<(), CivicError> {
        let mut selections = self.selections.lock().await;
        if selection.active && selection.slot == Slot::Local {
            for other in selections.iter_mut().filter(|s| s.slot == Slot::Local) {
                other.active = false;
            }
        }
        if selection.slot == Slot::Federal {
            selections.retain(|s| s.slot != Slot::Federal);
        }
        match selections
            .iter_mut()
            .find(|s| s.slot == selection.slot && s.name == selection.name)
        {
            Some(existing) => *existing = selection.clone(),
            None => selections.push(selection.clone()),
        }
        Ok(())
    }
}
