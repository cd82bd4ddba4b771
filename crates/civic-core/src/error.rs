// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Civic ingestion core.

use thiserror::Error;

use crate::types::DataType;

/// The primary error type used across plugin traits, storage, and the sync engine.
#[derive(Debug, Error)]
pub enum CivicError {
    /// Application configuration errors (bad values, missing selections).
    #[error("configuration error: {0}")]
    Config(String),

    /// A plugin descriptor file could not be parsed as JSON or TOML.
    #[error("failed to parse plugin descriptor {file}: {message}")]
    Parse { file: String, message: String },

    /// A plugin descriptor parsed but is structurally invalid.
    #[error("invalid plugin descriptor {file}: {detail}")]
    Validation { file: String, detail: String },

    /// A plugin could not be instantiated or initialized.
    #[error("failed to load plugin {name}: {message}")]
    PluginLoad { name: String, message: String },

    /// A provider rejected a fetch call.
    #[error("{plugin} failed to fetch {data_type}: {message}")]
    Fetch {
        plugin: String,
        data_type: DataType,
        message: String,
    },

    /// Storage backend errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A plugin was used before `initialize` succeeded.
    #[error("plugin {0} is not initialized")]
    NotInitialized(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CivicError {
    /// Shorthand for a fetch failure raised by a provider.
    pub fn fetch(plugin: impl Into<String>, data_type: DataType, message: impl Into<String>) -> Self {
        CivicError::Fetch {
            plugin: plugin.into(),
            data_type,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CivicError {
    fn from(e: serde_json::Error) -> Self {
        CivicError::Internal(format!("json: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_file_and_path() {
        let err = CivicError::Validation {
            file: "plugins/ca.json".into(),
            detail: "dataSources[2] missing field url".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("plugins/ca.json"));
        assert!(msg.contains("dataSources[2] missing field url"));
    }

    #[test]
    fn fetch_error_mentions_data_type() {
        let err = CivicError::fetch("california", DataType::Meetings, "HTTP 503");
        assert_eq!(err.to_string(), "california failed to fetch meetings: HTTP 503");
    }
}
