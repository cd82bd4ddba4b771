// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Region plugin capability contract.

use async_trait::async_trait;

use crate::descriptor::{DataSource, DeclarativeRegionConfig};
use crate::error::CivicError;
use crate::records::{CampaignFinanceData, Meeting, Proposition, Representative};
use crate::types::{DataType, PluginHealth, RegionInfo};

/// A regional civic data provider.
///
/// Required methods cover identity, lifecycle, health, and the three basic
/// fetches. Optional capabilities are exposed through accessor methods that
/// return `None` by default; callers dispatch by checking for the capability
/// rather than by type.
#[async_trait]
pub trait RegionPlugin: Send + Sync + 'static {
    /// Descriptor name of this plugin instance.
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    fn region_info(&self) -> RegionInfo;

    /// Data types this plugin can produce, in sync order.
    fn supported_data_types(&self) -> Vec<DataType>;

    async fn fetch_propositions(&self) -> Result<Vec<Proposition>, CivicError>;

    async fn fetch_meetings(&self) -> Result<Vec<Meeting>, CivicError>;

    async fn fetch_representatives(&self) -> Result<Vec<Representative>, CivicError>;

    /// Campaign finance capability, when the provider has one.
    fn campaign_finance(&self) -> Option<&dyn CampaignFinanceSource> {
        None
    }

    /// Prepare the plugin for fetching. Called once per registration.
    async fn initialize(&self, config: Option<&DeclarativeRegionConfig>) -> Result<(), CivicError>;

    async fn health_check(&self) -> Result<PluginHealth, CivicError>;

    /// Release held resources. Called when the plugin leaves its slot.
    async fn destroy(&self) -> Result<(), CivicError>;
}

/// Optional capability: campaign finance bundles.
#[async_trait]
pub trait CampaignFinanceSource: Send + Sync {
    async fn fetch_campaign_finance(&self) -> Result<CampaignFinanceData, CivicError>;
}

/// Opaque upstream retrieval for declarative plugins.
///
/// Implementations own transport, scraping, and retry policy. Each returned
/// value is one upstream item; campaign finance sources return bundles shaped
/// like [`CampaignFinanceData`].
#[async_trait]
pub trait SourceFetcher: Send + Sync + 'static {
    async fn fetch(&self, source: &DataSource) -> Result<Vec<serde_json::Value>, CivicError>;
}
