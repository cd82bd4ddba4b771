// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup wiring from a plugin directory through registration and sync.

use std::fs;
use std::sync::Arc;

use civic_config::CivicConfig;
use civic_core::descriptor::RegionPluginDescriptor;
use civic_core::traits::{RegionPlugin, SelectionStore};
use civic_core::types::{DataType, Slot};
use civic_core::CivicError;
use civic_plugin::{PluginFactory, PluginLoader, PluginRegistry};
use civic_sync::{SlotOutcome, SyncEngine, bootstrap, select_region};
use civic_test_utils::{MemoryRecordStore, MemorySelectionStore, StaticFetcher};
use serde_json::json;
use tempfile::TempDir;
use tracing_test::traced_test;

const CONTRIBUTIONS_URL: &str = "https://fec.test/contributions";

fn write_plugins(dir: &TempDir) {
    let california = json!({
        "name": "california",
        "displayName": "California",
        "description": "State of California",
        "version": "1.0.0",
        "config": {
            "regionId": "ca",
            "stateCode": "CA",
            "dataSources": [
                { "url": "https://ca.test/props", "dataType": "propositions", "contentGoal": "measures" }
            ]
        }
    });
    let federal = json!({
        "name": "federal",
        "displayName": "Federal",
        "description": "Federal campaign finance",
        "version": "1.0.0",
        "config": {
            "regionId": "us",
            "dataSources": [{
                "url": CONTRIBUTIONS_URL,
                "dataType": "campaign_finance",
                "contentGoal": "contributions",
                "api": { "queryParams": { "contributor_state": "${stateCode}", "per_page": 100 } },
                "bulk": { "filters": { "state": "${stateCode}" } }
            }]
        }
    });
    fs::write(dir.path().join("california.json"), california.to_string()).unwrap();
    fs::write(dir.path().join("federal.json"), federal.to_string()).unwrap();
}

fn config(dir: &TempDir, local_region: Option<&str>) -> CivicConfig {
    let mut config = CivicConfig::default();
    config.plugins.directory = dir.path().display().to_string();
    config.plugins.local_region = local_region.map(str::to_string);
    config
}

fn fetcher() -> Arc<StaticFetcher> {
    Arc::new(StaticFetcher::new().with_items(
        CONTRIBUTIONS_URL,
        vec![json!({
            "contributions": [{
                "externalId": "k1", "committeeId": "c1",
                "contributorName": "Pat", "amount": 50
            }]
        })],
    ))
}

#[tokio::test]
async fn federal_config_is_resolved_from_local_region() {
    let dir = TempDir::new().unwrap();
    write_plugins(&dir);
    let fetcher = fetcher();
    let loader = PluginLoader::new(fetcher.clone());
    let registry = Arc::new(PluginRegistry::new());
    let selections = MemorySelectionStore::new();

    let report = bootstrap(&config(&dir, Some("california")), &selections, &loader, &registry)
        .await
        .unwrap();
    assert_eq!(report.discovered, 2);
    assert!(report.local.is_registered());
    assert!(report.federal.is_registered());
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    let engine = SyncEngine::new(registry, Arc::new(MemoryRecordStore::new()));
    let results = engine.sync_all().await;
    let finance = results
        .iter()
        .find(|r| r.data_type == DataType::CampaignFinance)
        .unwrap();
    assert_eq!(finance.items_processed, 1);

    let federal_source = fetcher
        .requested()
        .await
        .into_iter()
        .find(|s| s.url == CONTRIBUTIONS_URL)
        .unwrap();
    assert_eq!(
        federal_source.param("api/queryParams/contributor_state"),
        Some(&json!("CA"))
    );
    assert_eq!(federal_source.param("bulk/filters/state"), Some(&json!("CA")));
    assert_eq!(federal_source.param("api/queryParams/per_page"), Some(&json!(100)));

    let persisted = selections.find_active_local().await.unwrap().unwrap();
    assert_eq!(persisted.name, "california");
    assert_eq!(selections.find_federal().await.unwrap().unwrap().name, "federal");
}

#[traced_test]
#[tokio::test]
async fn without_local_region_federal_keeps_tokens_and_warns() {
    let dir = TempDir::new().unwrap();
    write_plugins(&dir);
    let fetcher = fetcher();
    let loader = PluginLoader::new(fetcher.clone());
    let registry = Arc::new(PluginRegistry::new());

    let report = bootstrap(&config(&dir, None), &MemorySelectionStore::new(), &loader, &registry)
        .await
        .unwrap();
    assert_eq!(report.local, SlotOutcome::Absent);
    assert!(report.federal.is_registered());
    assert!(report.warnings.iter().any(|w| w.contains("left unresolved")));
    assert!(logs_contain("no active local region"));

    SyncEngine::new(registry, Arc::new(MemoryRecordStore::new()))
        .sync_all()
        .await;
    let federal_source = fetcher.requested().await.pop().unwrap();
    assert_eq!(
        federal_source.param("api/queryParams/contributor_state"),
        Some(&json!("${stateCode}"))
    );
}

#[tokio::test]
async fn persisted_selection_wins_over_config() {
    let dir = TempDir::new().unwrap();
    write_plugins(&dir);
    fs::write(
        dir.path().join("texas.json"),
        civic_test_utils::fixtures::descriptor_json("texas", "tx", &[DataType::Meetings]).to_string(),
    )
    .unwrap();
    let loader = PluginLoader::new(fetcher());
    let registry = Arc::new(PluginRegistry::new());
    let selections = MemorySelectionStore::new();

    let descriptors = civic_plugin::discover_descriptors(dir.path()).unwrap();
    select_region(&selections, &descriptors, Slot::Local, "texas")
        .await
        .unwrap();

    let report = bootstrap(&config(&dir, Some("california")), &selections, &loader, &registry)
        .await
        .unwrap();
    assert_eq!(
        report.local,
        SlotOutcome::Registered {
            name: "texas".to_string()
        }
    );
    assert_eq!(registry.get_local().await.unwrap().name(), "texas");
}

#[tokio::test]
async fn persisted_federal_selection_wins_over_config() {
    let dir = TempDir::new().unwrap();
    write_plugins(&dir);
    fs::write(
        dir.path().join("fec2.json"),
        civic_test_utils::fixtures::descriptor_json("fec2", "us", &[DataType::CampaignFinance])
            .to_string(),
    )
    .unwrap();
    let loader = PluginLoader::new(fetcher());
    let registry = Arc::new(PluginRegistry::new());
    let selections = MemorySelectionStore::new();

    let descriptors = civic_plugin::discover_descriptors(dir.path()).unwrap();
    select_region(&selections, &descriptors, Slot::Federal, "fec2")
        .await
        .unwrap();

    let report = bootstrap(&config(&dir, Some("california")), &selections, &loader, &registry)
        .await
        .unwrap();
    assert_eq!(
        report.federal,
        SlotOutcome::Registered {
            name: "fec2".to_string()
        }
    );
    assert_eq!(registry.get_federal().await.unwrap().name(), "fec2");
    assert_eq!(selections.find_federal().await.unwrap().unwrap().name, "fec2");
}

struct RefusingFactory;

impl PluginFactory for RefusingFactory {
    fn create(&self, _: &RegionPluginDescriptor) -> Result<Arc<dyn RegionPlugin>, CivicError> {
        Err(CivicError::Internal("missing API key".into()))
    }
}

#[tokio::test]
async fn local_failure_does_not_block_federal() {
    let dir = TempDir::new().unwrap();
    write_plugins(&dir);
    let loader = PluginLoader::new(fetcher()).with_factory("california", Arc::new(RefusingFactory));
    let registry = Arc::new(PluginRegistry::new());

    let report = bootstrap(
        &config(&dir, Some("california")),
        &MemorySelectionStore::new(),
        &loader,
        &registry,
    )
    .await
    .unwrap();
    match &report.local {
        SlotOutcome::Failed { name, error } => {
            assert_eq!(name, "california");
            assert!(error.contains("missing API key"));
        }
        other => panic!("unexpected local outcome: {other:?}"),
    }
    assert!(report.federal.is_registered());
    assert!(registry.get_local().await.is_none());
    assert!(registry.get_federal().await.is_some());
}

#[tokio::test]
async fn invalid_descriptor_aborts_startup() {
    let dir = TempDir::new().unwrap();
    write_plugins(&dir);
    fs::write(dir.path().join("zz-broken.json"), r#"{ "name": "broken" }"#).unwrap();
    let loader = PluginLoader::new(fetcher());

    let err = bootstrap(
        &config(&dir, Some("california")),
        &MemorySelectionStore::new(),
        &loader,
        &PluginRegistry::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CivicError::Validation { .. }));
}

#[tokio::test]
async fn selecting_an_unknown_region_fails() {
    let err = select_region(&MemorySelectionStore::new(), &[], Slot::Local, "atlantis")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("atlantis"));
}
