// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciliation against the SQLite store.

use std::sync::Arc;

use civic_core::types::{DataType, PageRequest, Slot};
use civic_plugin::PluginRegistry;
use civic_storage::SqliteStore;
use civic_sync::SyncEngine;
use civic_test_utils::{MockPlugin, fixtures};

async fn engine_over_sqlite(plugin: Arc<MockPlugin>) -> SyncEngine {
    let registry = Arc::new(PluginRegistry::new());
    registry
        .register(Slot::Local, "ohio", plugin, None)
        .await
        .unwrap();
    let store = SqliteStore::open_in_memory().await.unwrap();
    SyncEngine::new(registry, Arc::new(store))
}

#[tokio::test]
async fn second_sync_splits_created_and_updated() {
    let plugin = Arc::new(MockPlugin::new("ohio").with_propositions(fixtures::propositions("a", 500)));
    let engine = engine_over_sqlite(plugin.clone()).await;

    let first = engine.sync_data_type(DataType::Propositions).await;
    assert!(first.is_success(), "{:?}", first.errors);
    assert_eq!(first.items_created, 500);
    assert_eq!(first.items_updated, 0);

    let mut next = fixtures::propositions("a", 500);
    next.extend(fixtures::propositions("b", 500));
    plugin.set_propositions(next).await;

    let second = engine.sync_data_type(DataType::Propositions).await;
    assert_eq!(second.items_processed, 1000);
    assert_eq!(second.items_created, 500);
    assert_eq!(second.items_updated, 500);

    let page = engine.propositions(PageRequest::new(0, 10)).await.unwrap();
    assert_eq!(page.total, 1000);
    assert_eq!(page.items[0].record.external_id, "a-0");

    let past_end = engine
        .propositions(PageRequest::new(usize::MAX, 10))
        .await
        .unwrap();
    assert!(past_end.items.is_empty());
    assert!(!past_end.has_more);
}

#[tokio::test]
async fn updates_keep_the_persisted_id() {
    let plugin = Arc::new(MockPlugin::new("ohio").with_propositions(fixtures::propositions("p", 1)));
    let engine = engine_over_sqlite(plugin.clone()).await;

    engine.sync_data_type(DataType::Propositions).await;
    let before = engine.propositions(PageRequest::default()).await.unwrap();

    let mut changed = fixtures::proposition("p-0");
    changed.title = "Renamed measure".to_string();
    plugin.set_propositions(vec![changed]).await;
    let result = engine.sync_data_type(DataType::Propositions).await;
    assert_eq!(result.items_updated, 1);

    let after = engine.propositions(PageRequest::default()).await.unwrap();
    assert_eq!(after.total, 1);
    assert_eq!(after.items[0].id, before.items[0].id);
    assert_eq!(after.items[0].record.title, "Renamed measure");
}
