// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide wiring shared by the subcommands.
//!
//! Opens the store, runs startup against the plugin directory, and hands the
//! resulting registry to a [`SyncEngine`]. [`App::shutdown`] tears the
//! registry down before closing the database.

use std::sync::Arc;

use civic_config::CivicConfig;
use civic_core::traits::SourceFetcher;
use civic_core::CivicError;
use civic_plugin::{PluginLoader, PluginRegistry};
use civic_storage::SqliteStore;
use civic_sync::{StartupReport, SyncEngine, bootstrap};
use tracing::{info, warn};

pub struct App {
    pub config: CivicConfig,
    pub store: Arc<SqliteStore>,
    pub registry: Arc<PluginRegistry>,
    pub engine: Arc<SyncEngine>,
    pub report: StartupReport,
}

impl App {
    pub async fn start(
        config: CivicConfig,
        fetcher: Arc<dyn SourceFetcher>,
    ) -> Result<Self, CivicError> {
        let store = Arc::new(SqliteStore::open(&config.storage).await?);
        Self::start_with_store(config, store, fetcher).await
    }

    pub async fn start_with_store(
        config: CivicConfig,
        store: Arc<SqliteStore>,
        fetcher: Arc<dyn SourceFetcher>,
    ) -> Result<Self, CivicError> {
        let loader = PluginLoader::new(fetcher);
        let registry = Arc::new(PluginRegistry::new());
        let report = bootstrap(&config, store.as_ref(), &loader, &registry).await?;
        for warning in &report.warnings {
            warn!("{warning}");
        }

        let engine = Arc::new(SyncEngine::new(registry.clone(), store.clone()));
        Ok(Self {
            config,
            store,
            registry,
            engine,
            report,
        })
    }

    /// Destroy every registered plugin, then close the database.
    pub async fn shutdown(self) -> Result<(), CivicError> {
        self.registry.teardown().await;
        drop(self.engine);
        match Arc::try_unwrap(self.store) {
            Ok(store) => store.close().await?,
            Err(_) => warn!("store still shared at shutdown, skipping WAL checkpoint"),
        }
        info!("shutdown complete");
        Ok(())
    }
}
