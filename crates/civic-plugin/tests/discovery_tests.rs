// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory-level discovery tests.

use std::fs;

use civic_core::CivicError;
use civic_plugin::{discover_descriptors, find_descriptor};
use tempfile::TempDir;

const OHIO: &str = r#"{
  "name": "ohio",
  "displayName": "Ohio",
  "description": "State of Ohio",
  "version": "1.0.0",
  "config": {
    "regionId": "oh",
    "stateCode": "OH",
    "dataSources": [
      { "url": "https://oh.test/props", "dataType": "PROPOSITIONS", "contentGoal": "measures" }
    ]
  }
}"#;

const FEDERAL: &str = r#"
name = "federal"
displayName = "Federal"
description = "Federal campaign finance"
version = "2.0.0"

[config]
regionId = "us"

[[config.dataSources]]
url = "https://fec.test/committees"
dataType = "campaign_finance"
contentGoal = "committees"
sourceType = "bulk_download"

[config.dataSources.api.queryParams]
state = "${stateCode}"
"#;

#[test]
fn missing_directory_yields_empty_list() {
    let dir = TempDir::new().unwrap();
    let descriptors = discover_descriptors(&dir.path().join("nope")).unwrap();
    assert!(descriptors.is_empty());
}

#[test]
fn json_and_toml_are_discovered_in_name_order() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b-ohio.json"), OHIO).unwrap();
    fs::write(dir.path().join("a-federal.toml"), FEDERAL).unwrap();
    fs::write(dir.path().join("README.md"), "# not a plugin").unwrap();

    let descriptors = discover_descriptors(dir.path()).unwrap();
    let names: Vec<_> = descriptors.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["federal", "ohio"]);

    let federal = find_descriptor(&descriptors, "federal").unwrap();
    assert_eq!(
        federal.config.data_sources[0]
            .param("api/queryParams/state")
            .and_then(|v| v.as_str()),
        Some("${stateCode}")
    );
    assert!(find_descriptor(&descriptors, "texas").is_none());
}

#[test]
fn unparsable_file_aborts_discovery() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), OHIO).unwrap();
    fs::write(dir.path().join("b.json"), "{ not json").unwrap();

    let err = discover_descriptors(dir.path()).unwrap_err();
    match err {
        CivicError::Parse { file, .. } => assert!(file.ends_with("b.json")),
        other => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn invalid_file_names_the_field() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("broken.json"),
        OHIO.replace("\"contentGoal\": \"measures\"", "\"note\": \"x\""),
    )
    .unwrap();

    let err = discover_descriptors(dir.path()).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("dataSources[0] missing field contentGoal"), "{text}");
    assert!(text.contains("broken.json"), "{text}");
}

#[test]
fn duplicate_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("one.json"), OHIO).unwrap();
    fs::write(dir.path().join("two.json"), OHIO).unwrap();

    let err = discover_descriptors(dir.path()).unwrap_err();
    assert!(err.to_string().contains("duplicate plugin name `ohio`"));
}
