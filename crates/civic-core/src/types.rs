// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by plugins, storage, and the sync engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Civic data category. Partitions both fetch calls and persisted collections.
///
/// Serialized as snake_case. Parsing, from text or from serde, ignores ASCII case.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum DataType {
    Propositions,
    Meetings,
    Representatives,
    CampaignFinance,
}

impl TryFrom<String> for DataType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .parse()
            .map_err(|_| format!("unknown data type `{value}`"))
    }
}

impl DataType {
    /// Every data type, in canonical order.
    pub const ALL: [DataType; 4] = [
        DataType::Propositions,
        DataType::Meetings,
        DataType::Representatives,
        DataType::CampaignFinance,
    ];

    /// Persisted collections written by a sync of this data type.
    pub fn collections(self) -> &'static [Collection] {
        match self {
            DataType::Propositions => &[Collection::Propositions],
            DataType::Meetings => &[Collection::Meetings],
            DataType::Representatives => &[Collection::Representatives],
            DataType::CampaignFinance => &[
                Collection::Committees,
                Collection::Contributions,
                Collection::Expenditures,
                Collection::IndependentExpenditures,
            ],
        }
    }
}

/// A persisted collection. Campaign finance fans out into four of them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Propositions,
    Meetings,
    Representatives,
    Committees,
    Contributions,
    Expenditures,
    IndependentExpenditures,
}

impl Collection {
    /// Stable name used as the storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Propositions => "propositions",
            Collection::Meetings => "meetings",
            Collection::Representatives => "representatives",
            Collection::Committees => "committees",
            Collection::Contributions => "contributions",
            Collection::Expenditures => "expenditures",
            Collection::IndependentExpenditures => "independent_expenditures",
        }
    }
}

/// Outcome of one reconciliation attempt for a (plugin, data type) pair.
///
/// `items_created + items_updated == items_processed` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    /// Name of the plugin that produced the records.
    pub plugin: String,
    pub data_type: DataType,
    pub items_processed: usize,
    pub items_created: usize,
    pub items_updated: usize,
    /// Error messages in the order they occurred.
    pub errors: Vec<String>,
    pub synced_at: DateTime<Utc>,
}

impl SyncResult {
    /// A result with zero items and no errors.
    pub fn empty(plugin: impl Into<String>, data_type: DataType) -> Self {
        Self {
            plugin: plugin.into(),
            data_type,
            items_processed: 0,
            items_created: 0,
            items_updated: 0,
            errors: Vec::new(),
            synced_at: Utc::now(),
        }
    }

    /// A zero-item result carrying a single error message.
    pub fn failed(plugin: impl Into<String>, data_type: DataType, error: impl Into<String>) -> Self {
        let mut result = Self::empty(plugin, data_type);
        result.errors.push(error.into());
        result
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Health reported by a plugin (or synthesized by the registry on failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginHealth {
    pub healthy: bool,
    pub message: String,
    pub last_check: DateTime<Utc>,
}

impl PluginHealth {
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            healthy: true,
            message: message.into(),
            last_check: Utc::now(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            healthy: false,
            message: message.into(),
            last_check: Utc::now(),
        }
    }
}

/// Descriptive information about the region a plugin serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub timezone: String,
    pub data_source_urls: Vec<String>,
}

/// Which registry slot a plugin or persisted selection belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Local,
    Federal,
}

/// A persisted operator selection of a regional plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSelection {
    pub slot: Slot,
    /// Descriptor name of the selected plugin.
    pub name: String,
    /// Snapshot of the descriptor at selection time.
    pub descriptor: serde_json::Value,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

/// Maximum page size accepted by read accessors.
pub const MAX_PAGE_LIMIT: usize = 500;

/// Page size used when none is requested.
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Offset/limit pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Build a request, clamping `limit` into `1..=MAX_PAGE_LIMIT`.
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_LIMIT)
    }
}

/// One page of read results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, request: PageRequest) -> Self {
        Self {
            items,
            total,
            offset: request.offset,
            limit: request.limit,
            has_more: request.offset.saturating_add(request.limit) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn data_type_parses_both_spellings() {
        assert_eq!(DataType::from_str("campaign_finance").unwrap(), DataType::CampaignFinance);
        assert_eq!(DataType::from_str("CAMPAIGN_FINANCE").unwrap(), DataType::CampaignFinance);
        assert_eq!(DataType::from_str("Meetings").unwrap(), DataType::Meetings);
        assert!(DataType::from_str("weather").is_err());
    }

    #[test]
    fn data_type_serde_accepts_upper_alias() {
        let dt: DataType = serde_json::from_str("\"PROPOSITIONS\"").unwrap();
        assert_eq!(dt, DataType::Propositions);
        assert_eq!(serde_json::to_string(&dt).unwrap(), "\"propositions\"");
    }

    #[test]
    fn data_type_serde_and_from_str_agree() {
        for spelling in ["meetings", "MEETINGS", "Meetings"] {
            let parsed: DataType = serde_json::from_value(serde_json::json!(spelling)).unwrap();
            assert_eq!(parsed, DataType::from_str(spelling).unwrap());
        }
        let mixed: DataType = serde_json::from_str("\"Campaign_Finance\"").unwrap();
        assert_eq!(mixed, DataType::CampaignFinance);
        let err = serde_json::from_str::<DataType>("\"weather\"").unwrap_err();
        assert!(err.to_string().contains("unknown data type `weather`"));
    }

    #[test]
    fn campaign_finance_fans_out_to_four_collections() {
        assert_eq!(DataType::CampaignFinance.collections().len(), 4);
        assert_eq!(DataType::Meetings.collections(), &[Collection::Meetings]);
    }

    #[test]
    fn collection_display_matches_storage_key() {
        for c in [
            Collection::Propositions,
            Collection::IndependentExpenditures,
            Collection::Committees,
        ] {
            assert_eq!(c.to_string(), c.as_str());
        }
    }

    #[test]
    fn page_has_more_math() {
        let req = PageRequest::new(0, 10);
        assert!(Page::<u8>::new(vec![], 11, req).has_more);
        assert!(!Page::<u8>::new(vec![], 10, req).has_more);
        let req = PageRequest::new(20, 10);
        assert!(!Page::<u8>::new(vec![], 25, req).has_more);
    }

    #[test]
    fn page_at_maximum_offset_has_no_more() {
        let page = Page::<u8>::new(vec![], 10, PageRequest::new(usize::MAX, 50));
        assert!(!page.has_more);
        assert_eq!(page.offset, usize::MAX);
    }

    #[test]
    fn page_request_clamps_limit() {
        assert_eq!(PageRequest::new(0, 0).limit, 1);
        assert_eq!(PageRequest::new(0, 10_000).limit, MAX_PAGE_LIMIT);
        assert_eq!(PageRequest::default().limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn failed_result_has_zero_counts() {
        let r = SyncResult::failed("ca", DataType::Meetings, "boom");
        assert_eq!(r.items_processed, 0);
        assert_eq!(r.errors, vec!["boom".to_string()]);
        assert!(!r.is_success());
    }
}
