// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::CivicConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Shortest accepted scheduled sync interval.
pub const MIN_INTERVAL_SECS: u64 = 60;

/// Validate a deserialized configuration. Collects every error instead of
/// failing fast.
pub fn validate_config(config: &CivicConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` must be one of: {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.plugins.directory.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "plugins.directory must not be empty".to_string(),
        });
    }

    if config.plugins.federal.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "plugins.federal must not be empty".to_string(),
        });
    }

    if let Some(local) = &config.plugins.local_region {
        if local.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "plugins.local_region must not be empty when set".to_string(),
            });
        } else if *local == config.plugins.federal {
            errors.push(ConfigError::Validation {
                message: format!(
                    "plugins.local_region `{local}` cannot also be the federal plugin"
                ),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.sync.interval_secs < MIN_INTERVAL_SECS {
        errors.push(ConfigError::Validation {
            message: format!(
                "sync.interval_secs must be at least {MIN_INTERVAL_SECS}, got {}",
                config.sync.interval_secs
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&CivicConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = CivicConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "database_path"));
    }

    #[test]
    fn local_region_cannot_be_federal() {
        let mut config = CivicConfig::default();
        config.plugins.local_region = Some("federal".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "cannot also be the federal plugin"));
    }

    #[test]
    fn collects_every_error() {
        let mut config = CivicConfig::default();
        config.log.level = "loud".to_string();
        config.plugins.directory = " ".to_string();
        config.sync.interval_secs = 5;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_message(&errors, "log.level"));
        assert!(has_message(&errors, "plugins.directory"));
        assert!(has_message(&errors, "sync.interval_secs"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = CivicConfig::default();
        config.log.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
