// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Descriptor-driven region plugin.
//!
//! A [`DeclarativePlugin`] has no code of its own: it walks the data sources
//! of its active configuration, hands each one to a [`SourceFetcher`], and
//! decodes the returned items into typed records.
//!
//! Advertised capabilities come from the descriptor, so `initialize` only
//! accepts a configuration covering the same data types.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use civic_core::descriptor::{DeclarativeRegionConfig, RegionPluginDescriptor};
use civic_core::records::{CampaignFinanceData, Meeting, Proposition, Representative};
use civic_core::traits::{CampaignFinanceSource, RegionPlugin, SourceFetcher};
use civic_core::types::{DataType, PluginHealth, RegionInfo};
use civic_core::CivicError;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::debug;

const DEFAULT_TIMEZONE: &str = "UTC";

/// Region plugin backed entirely by its descriptor.
pub struct DeclarativePlugin {
    descriptor: RegionPluginDescriptor,
    fetcher: Arc<dyn SourceFetcher>,
    /// Configuration installed by `initialize`; `None` before and after the lifecycle.
    active: RwLock<Option<DeclarativeRegionConfig>>,
}

impl DeclarativePlugin {
    pub fn new(descriptor: RegionPluginDescriptor, fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self {
            descriptor,
            fetcher,
            active: RwLock::new(None),
        }
    }

    pub fn descriptor(&self) -> &RegionPluginDescriptor {
        &self.descriptor
    }

    async fn active_config(&self) -> Result<DeclarativeRegionConfig, CivicError> {
        self.active
            .read()
            .await
            .clone()
            .ok_or_else(|| CivicError::NotInitialized(self.descriptor.name.clone()))
    }

    /// Fetch every source of `data_type` and decode each returned item as `T`.
    async fn fetch_items<T: DeserializeOwned>(&self, data_type: DataType) -> Result<Vec<T>, CivicError> {
        let config = self.active_config().await?;
        let mut out = Vec::new();
        for source in config.sources_for(data_type) {
            let items = self.fetcher.fetch(source).await.map_err(|e| match e {
                CivicError::Fetch { .. } => e,
                other => CivicError::fetch(&self.descriptor.name, data_type, other.to_string()),
            })?;
            debug!(
                plugin = %self.descriptor.name,
                url = %source.url,
                items = items.len(),
                "source fetched"
            );
            for (index, item) in items.into_iter().enumerate() {
                let decoded = serde_json::from_value(item).map_err(|e| {
                    CivicError::fetch(
                        &self.descriptor.name,
                        data_type,
                        format!("item {index} from {} is malformed: {e}", source.url),
                    )
                })?;
                out.push(decoded);
            }
        }
        Ok(out)
    }
}

impl std::fmt::Debug for DeclarativePlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeclarativePlugin")
            .field("name", &self.descriptor.name)
            .field("version", &self.descriptor.version)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RegionPlugin for DeclarativePlugin {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn version(&self) -> &str {
        &self.descriptor.version
    }

    fn region_info(&self) -> RegionInfo {
        let config = &self.descriptor.config;
        RegionInfo {
            id: config.region_id.clone(),
            name: self.descriptor.display_name.clone(),
            description: self.descriptor.description.clone(),
            timezone: config
                .timezone
                .clone()
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            data_source_urls: config.data_sources.iter().map(|s| s.url.clone()).collect(),
        }
    }

    fn supported_data_types(&self) -> Vec<DataType> {
        self.descriptor.config.data_types()
    }

    async fn fetch_propositions(&self) -> Result<Vec<Proposition>, CivicError> {
        self.fetch_items(DataType::Propositions).await
    }

    async fn fetch_meetings(&self) -> Result<Vec<Meeting>, CivicError> {
        self.fetch_items(DataType::Meetings).await
    }

    async fn fetch_representatives(&self) -> Result<Vec<Representative>, CivicError> {
        self.fetch_items(DataType::Representatives).await
    }

    fn campaign_finance(&self) -> Option<&dyn CampaignFinanceSource> {
        self.descriptor
            .config
            .sources_for(DataType::CampaignFinance)
            .next()
            .map(|_| self as &dyn CampaignFinanceSource)
    }

    async fn initialize(&self, config: Option<&DeclarativeRegionConfig>) -> Result<(), CivicError> {
        let config = config.unwrap_or(&self.descriptor.config).clone();
        if config.data_sources.is_empty() {
            return Err(CivicError::PluginLoad {
                name: self.descriptor.name.clone(),
                message: "configuration has no data sources".to_string(),
            });
        }
        let declared: HashSet<DataType> = self.descriptor.config.data_types().into_iter().collect();
        let offered: HashSet<DataType> = config.data_types().into_iter().collect();
        if declared != offered {
            return Err(CivicError::PluginLoad {
                name: self.descriptor.name.clone(),
                message: format!(
                    "configuration data types {:?} differ from descriptor data types {:?}",
                    config.data_types(),
                    self.descriptor.config.data_types()
                ),
            });
        }
        debug!(
            plugin = %self.descriptor.name,
            region = %config.region_id,
            sources = config.data_sources.len(),
            "declarative plugin initialized"
        );
        *self.active.write().await = Some(config);
        Ok(())
    }

    async fn health_check(&self) -> Result<PluginHealth, CivicError> {
        Ok(match self.active.read().await.as_ref() {
            Some(config) => PluginHealth::healthy(format!(
                "{} data sources configured",
                config.data_sources.len()
            )),
            None => PluginHealth::unhealthy("not initialized"),
        })
    }

    async fn destroy(&self) -> Result<(), CivicError> {
        self.active.write().await.take();
        debug!(plugin = %self.descriptor.name, "declarative plugin destroyed");
        Ok(())
    }
}

#[async_trait]
impl CampaignFinanceSource for DeclarativePlugin {
    async fn fetch_campaign_finance(&self) -> Result<CampaignFinanceData, CivicError> {
        let bundles: Vec<CampaignFinanceData> = self.fetch_items(DataType::CampaignFinance).await?;
        let mut merged = CampaignFinanceData::default();
        for bundle in bundles {
            merged.merge(bundle);
        }
        Ok(merged)
    }
}
