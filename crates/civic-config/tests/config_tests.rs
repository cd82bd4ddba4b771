// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use civic_config::diagnostic::ConfigError;
use civic_config::{load_and_validate_str, load_config_from_str};

#[test]
fn valid_toml_deserializes_into_civic_config() {
    let toml = r#"
[log]
level = "debug"

[plugins]
directory = "/srv/civic/plugins"
local_region = "california"
federal = "fec"

[storage]
database_path = "/tmp/civic-test.db"
wal_mode = false

[sync]
interval_secs = 900
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.plugins.directory, "/srv/civic/plugins");
    assert_eq!(config.plugins.local_region.as_deref(), Some("california"));
    assert_eq!(config.plugins.federal, "fec");
    assert_eq!(config.storage.database_path, "/tmp/civic-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.sync.interval_secs, 900);
}

#[test]
fn unknown_field_produces_suggestion() {
    let toml = r#"
[plugins]
local_regoin = "california"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("expected an UnknownKey error");
    assert_eq!(unknown.0, "local_regoin");
    assert_eq!(unknown.1.as_deref(), Some("local_region"));
}

#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telemetry]
enabled = true
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[sync]
interval_secs = "soon"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject string interval");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::InvalidType { key, .. } if key.contains("interval_secs")
    )));
}

#[test]
fn semantic_validation_runs_after_parse() {
    let toml = r#"
[sync]
interval_secs = 10
"#;
    let errors = load_and_validate_str(toml).expect_err("interval too short");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("interval_secs"))));
}

#[test]
fn empty_config_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults validate");
    assert_eq!(config.plugins.federal, "federal");
}
