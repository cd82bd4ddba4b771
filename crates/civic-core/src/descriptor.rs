// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative region plugin descriptors.
//!
//! Descriptors are loaded from data files by plugin discovery. Field names
//! on the wire are camelCase (`displayName`, `regionId`, `dataSources`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use crate::types::DataType;

/// A validated plugin descriptor. Identity is `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionPluginDescriptor {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: String,
    pub config: DeclarativeRegionConfig,
}

/// Region configuration carried by a descriptor.
///
/// Keys other than the known ones are kept in `placeholders`; scalar entries
/// there (e.g. `stateCode`) feed `${token}` resolution of the federal config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarativeRegionConfig {
    pub region_id: String,
    pub data_sources: Vec<DataSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    #[serde(flatten)]
    pub placeholders: Map<String, Value>,
}

impl DeclarativeRegionConfig {
    /// Data sources of one data type, in declaration order.
    pub fn sources_for(&self, data_type: DataType) -> impl Iterator<Item = &DataSource> {
        self.data_sources
            .iter()
            .filter(move |s| s.data_type == data_type)
    }

    /// Distinct data types in first-appearance order.
    pub fn data_types(&self) -> Vec<DataType> {
        let mut types = Vec::new();
        for source in &self.data_sources {
            if !types.contains(&source.data_type) {
                types.push(source.data_type);
            }
        }
        types
    }

    /// A scalar placeholder value rendered as a string.
    pub fn placeholder(&self, key: &str) -> Option<String> {
        scalar_to_string(self.placeholders.get(key)?)
    }
}

/// Render a JSON scalar as a substitution string. Objects, arrays, and null yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Upstream request pacing hint for a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    pub requests_per_minute: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burst: Option<u32>,
}

/// How a data source is retrieved upstream.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    #[default]
    Api,
    BulkDownload,
}

/// One upstream source of a single data type.
///
/// Everything except the named fields lands in `params`, a nested bag whose
/// string leaves may carry `${key}` tokens (e.g. `api.queryParams`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub url: String,
    pub data_type: DataType,
    pub content_goal: String,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl DataSource {
    /// Look up a nested parameter by a `/`-separated path, e.g. `api/queryParams/state`.
    pub fn param(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let mut current = self.params.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}
