// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fetch-diff-write reconciliation of plugin output into storage.
//!
//! Each reconciliation costs exactly two storage round trips regardless of
//! how many records were fetched: one lookup of the collection's existing
//! external ids, and one transactional batch of upserts. Nothing is issued
//! when a fetch returns no records.
//!
//! Failures are data: a failed fetch or storage call becomes an error
//! string on that data type's [`SyncResult`] and the sync moves on.

use std::collections::HashMap;
use std::sync::Arc;

use civic_core::records::{CampaignFinanceData, ExternalRecord};
use civic_core::traits::{RecordStore, RecordUpsert, RegionPlugin};
use civic_core::types::{DataType, SyncResult};
use civic_core::CivicError;
use civic_plugin::PluginRegistry;
use tracing::{debug, info, warn};

/// Error recorded by `sync_data_type` when the local slot is empty or failed.
pub const NO_LOCAL_PLUGIN: &str = "no active local plugin";

/// Counts from one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Reconciled {
    processed: usize,
    created: usize,
    updated: usize,
}

impl Reconciled {
    fn apply(self, result: &mut SyncResult) {
        result.items_processed += self.processed;
        result.items_created += self.created;
        result.items_updated += self.updated;
    }
}

/// Drives reconciliation for the plugins held by a registry.
pub struct SyncEngine {
    registry: Arc<PluginRegistry>,
    store: Arc<dyn RecordStore>,
}

impl SyncEngine {
    pub fn new(registry: Arc<PluginRegistry>, store: Arc<dyn RecordStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    pub(crate) fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Sync every supported data type of every active plugin.
    ///
    /// Results are ordered by plugin (local first) and then by each plugin's
    /// supported data type order. Plugin handles are captured up front, so a
    /// concurrent slot replacement does not affect a sync already running.
    pub async fn sync_all(&self) -> Vec<SyncResult> {
        let plugins = self.registry.get_all().await;
        let mut results = Vec::new();
        for plugin in &plugins {
            for data_type in plugin.supported_data_types() {
                let result = self.sync_plugin(plugin.as_ref(), data_type).await;
                log_result(&result);
                results.push(result);
            }
        }

        info!(
            plugins = plugins.len(),
            results = results.len(),
            created = results.iter().map(|r| r.items_created).sum::<usize>(),
            updated = results.iter().map(|r| r.items_updated).sum::<usize>(),
            failed = results.iter().filter(|r| !r.is_success()).count(),
            "sync completed"
        );
        results
    }

    /// Sync one data type from the active local plugin.
    ///
    /// A plugin that does not support `data_type` yields a zero result.
    pub async fn sync_data_type(&self, data_type: DataType) -> SyncResult {
        let Some(plugin) = self.registry.get_local().await else {
            warn!(data_type = %data_type, "sync requested without an active local plugin");
            return SyncResult::failed("", data_type, NO_LOCAL_PLUGIN);
        };
        if !plugin.supported_data_types().contains(&data_type) {
            debug!(plugin = %plugin.name(), data_type = %data_type, "data type not supported, nothing to sync");
            return SyncResult::empty(plugin.name(), data_type);
        }
        let result = self.sync_plugin(plugin.as_ref(), data_type).await;
        log_result(&result);
        result
    }

    async fn sync_plugin(&self, plugin: &dyn RegionPlugin, data_type: DataType) -> SyncResult {
        let name = plugin.name();
        match data_type {
            DataType::Propositions => {
                let fetched = plugin.fetch_propositions().await;
                self.reconcile_fetched(name, data_type, fetched).await
            }
            DataType::Meetings => {
                let fetched = plugin.fetch_meetings().await;
                self.reconcile_fetched(name, data_type, fetched).await
            }
            DataType::Representatives => {
                let fetched = plugin.fetch_representatives().await;
                self.reconcile_fetched(name, data_type, fetched).await
            }
            DataType::CampaignFinance => match plugin.campaign_finance() {
                None => SyncResult::empty(name, data_type),
                Some(source) => match source.fetch_campaign_finance().await {
                    Ok(data) => self.reconcile_campaign_finance(name, data).await,
                    Err(e) => SyncResult::failed(name, data_type, e.to_string()),
                },
            },
        }
    }

    async fn reconcile_fetched<R: ExternalRecord>(
        &self,
        plugin: &str,
        data_type: DataType,
        fetched: Result<Vec<R>, CivicError>,
    ) -> SyncResult {
        let records = match fetched {
            Ok(records) => records,
            Err(e) => return SyncResult::failed(plugin, data_type, e.to_string()),
        };
        let mut result = SyncResult::empty(plugin, data_type);
        match self.reconcile(records).await {
            Ok(counts) => counts.apply(&mut result),
            Err(e) => result.errors.push(e.to_string()),
        }
        result
    }

    /// Reconcile the four sub-collections independently into one result.
    async fn reconcile_campaign_finance(&self, plugin: &str, data: CampaignFinanceData) -> SyncResult {
        let mut result = SyncResult::empty(plugin, DataType::CampaignFinance);
        let CampaignFinanceData {
            committees,
            contributions,
            expenditures,
            independent_expenditures,
        } = data;

        let outcomes = [
            ("committees", self.reconcile(committees).await),
            ("contributions", self.reconcile(contributions).await),
            ("expenditures", self.reconcile(expenditures).await),
            (
                "independent_expenditures",
                self.reconcile(independent_expenditures).await,
            ),
        ];
        for (collection, outcome) in outcomes {
            match outcome {
                Ok(counts) => counts.apply(&mut result),
                Err(e) => result.errors.push(format!("{collection}: {e}")),
            }
        }
        result
    }

    /// Partition `records` into creates and updates against one lookup and
    /// persist them in one batch.
    ///
    /// Repeated external ids collapse to their last occurrence.
    async fn reconcile<R: ExternalRecord>(&self, records: Vec<R>) -> Result<Reconciled, CivicError> {
        if records.is_empty() {
            return Ok(Reconciled::default());
        }

        let mut positions: HashMap<String, usize> = HashMap::with_capacity(records.len());
        let mut batch: Vec<RecordUpsert> = Vec::with_capacity(records.len());
        for record in records {
            let payload = serde_json::to_value(&record)?;
            let external_id = record.external_id().to_string();
            match positions.get(&external_id) {
                Some(&i) => batch[i].payload = payload,
                None => {
                    positions.insert(external_id.clone(), batch.len());
                    batch.push(RecordUpsert {
                        external_id,
                        payload,
                    });
                }
            }
        }

        let existing = self.store.existing_external_ids(R::COLLECTION).await?;
        let updated = batch
            .iter()
            .filter(|u| existing.contains(&u.external_id))
            .count();
        let counts = Reconciled {
            processed: batch.len(),
            created: batch.len() - updated,
            updated,
        };

        self.store.upsert_batch(R::COLLECTION, batch).await?;
        debug!(
            collection = %R::COLLECTION,
            processed = counts.processed,
            created = counts.created,
            updated = counts.updated,
            "collection reconciled"
        );
        Ok(counts)
    }
}

fn log_result(result: &SyncResult) {
    if result.is_success() {
        info!(
            plugin = %result.plugin,
            data_type = %result.data_type,
            processed = result.items_processed,
            created = result.items_created,
            updated = result.items_updated,
            "data type synced"
        );
    } else {
        warn!(
            plugin = %result.plugin,
            data_type = %result.data_type,
            processed = result.items_processed,
            errors = ?result.errors,
            "data type synced with errors"
        );
    }
}
