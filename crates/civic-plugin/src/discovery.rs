// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin descriptor discovery from a directory of `*.json` / `*.toml` files.
//!
//! Every file is parsed into one JSON tree, checked for required fields with
//! a precise field path in the error, then deserialized into a typed
//! [`RegionPluginDescriptor`]. The first invalid file aborts discovery.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use civic_core::descriptor::{RegionPluginDescriptor, SourceType};
use civic_core::{CivicError, DataType};
use serde_json::{Map, Value};
use tracing::{debug, info};

const DESCRIPTOR_FIELDS: [&str; 4] = ["name", "displayName", "version", "description"];
const SOURCE_FIELDS: [&str; 3] = ["url", "dataType", "contentGoal"];

/// Discover and validate every plugin descriptor in `dir`.
///
/// A missing directory yields an empty list. Files are visited in file-name
/// order; other extensions are ignored.
pub fn discover_descriptors(dir: &Path) -> Result<Vec<RegionPluginDescriptor>, CivicError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "plugin directory not found, no plugins discovered");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(CivicError::Config(format!(
                "cannot read plugin directory {}: {e}",
                dir.display()
            )));
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && descriptor_format(path).is_some())
        .collect();
    files.sort();

    let mut descriptors = Vec::with_capacity(files.len());
    let mut seen = HashSet::new();
    for path in files {
        let descriptor = load_descriptor_file(&path)?;
        if !seen.insert(descriptor.name.clone()) {
            return Err(CivicError::Validation {
                file: path.display().to_string(),
                detail: format!("duplicate plugin name `{}`", descriptor.name),
            });
        }
        descriptors.push(descriptor);
    }

    info!(
        dir = %dir.display(),
        count = descriptors.len(),
        "plugin descriptors discovered"
    );
    Ok(descriptors)
}

/// Find a descriptor by name.
pub fn find_descriptor<'a>(
    descriptors: &'a [RegionPluginDescriptor],
    name: &str,
) -> Option<&'a RegionPluginDescriptor> {
    descriptors.iter().find(|d| d.name == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DescriptorFormat {
    Json,
    Toml,
}

fn descriptor_format(path: &Path) -> Option<DescriptorFormat> {
    match path.extension()?.to_str()? {
        "json" => Some(DescriptorFormat::Json),
        "toml" => Some(DescriptorFormat::Toml),
        _ => None,
    }
}

/// Read, parse, and validate a single descriptor file.
pub fn load_descriptor_file(path: &Path) -> Result<RegionPluginDescriptor, CivicError> {
    let file = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| CivicError::Parse {
        file: file.clone(),
        message: e.to_string(),
    })?;
    let format = descriptor_format(path).unwrap_or(DescriptorFormat::Json);
    let value = parse_content(&content, format).map_err(|message| CivicError::Parse {
        file: file.clone(),
        message,
    })?;
    validate_descriptor(&value, &file)
}

fn parse_content(content: &str, format: DescriptorFormat) -> Result<Value, String> {
    match format {
        DescriptorFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        DescriptorFormat::Toml => {
            let table: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
            serde_json::to_value(table).map_err(|e| e.to_string())
        }
    }
}

/// Validate a parsed descriptor tree and convert it into a typed descriptor.
///
/// `file` is only used to label errors.
pub fn validate_descriptor(value: &Value, file: &str) -> Result<RegionPluginDescriptor, CivicError> {
    let invalid = |detail: String| CivicError::Validation {
        file: file.to_string(),
        detail,
    };

    let root = value
        .as_object()
        .ok_or_else(|| invalid("root value must be an object".to_string()))?;

    for field in DESCRIPTOR_FIELDS {
        require_string(root, field, "").map_err(invalid)?;
    }

    let config = match root.get("config") {
        None | Some(Value::Null) => return Err(invalid("missing field config".to_string())),
        Some(Value::Object(config)) => config,
        Some(_) => return Err(invalid("field config must be an object".to_string())),
    };
    require_string(config, "regionId", "config ").map_err(invalid)?;

    let sources = match config.get("dataSources") {
        None | Some(Value::Null) => {
            return Err(invalid("config missing field dataSources".to_string()));
        }
        Some(Value::Array(sources)) => sources,
        Some(_) => return Err(invalid("config.dataSources must be an array".to_string())),
    };
    if sources.is_empty() {
        return Err(invalid("config.dataSources must not be empty".to_string()));
    }

    for (i, source) in sources.iter().enumerate() {
        let prefix = format!("dataSources[{i}] ");
        let source = source
            .as_object()
            .ok_or_else(|| invalid(format!("dataSources[{i}] must be an object")))?;
        for field in SOURCE_FIELDS {
            require_string(source, field, &prefix).map_err(invalid)?;
        }
        if let Some(Value::String(data_type)) = source.get("dataType") {
            if DataType::from_str(data_type).is_err() {
                return Err(invalid(format!("dataSources[{i}] has unknown dataType `{data_type}`")));
            }
        }
        match source.get("sourceType") {
            None | Some(Value::Null) => {}
            Some(Value::String(kind)) if SourceType::from_str(kind).is_ok() => {}
            Some(other) => {
                return Err(invalid(format!(
                    "dataSources[{i}] has unknown sourceType {other}, expected api or bulk_download"
                )));
            }
        }
    }

    serde_json::from_value(value.clone()).map_err(|e| invalid(e.to_string()))
}

/// Require a non-empty string field, producing `"{prefix}missing field {field}"` on absence.
fn require_string(map: &Map<String, Value>, field: &str, prefix: &str) -> Result<(), String> {
    match map.get(field) {
        None | Some(Value::Null) => Err(format!("{prefix}missing field {field}")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(format!("{prefix}field {field} must not be empty"))
        }
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(format!("{prefix}field {field} must be a string")),
    }
}
