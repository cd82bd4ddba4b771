// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `civic show` and `civic select` command implementations.

use std::path::Path;

use civic_config::CivicConfig;
use civic_core::traits::SelectionStore;
use civic_core::types::{Collection, Page, PageRequest, RegionSelection, Slot};
use civic_core::CivicError;
use civic_plugin::discover_descriptors;
use civic_sync::{SyncEngine, select_region};
use serde_json::Value;

/// Print one page of `collection` as JSON.
pub async fn run_show(
    engine: &SyncEngine,
    collection: Collection,
    offset: usize,
    limit: usize,
) -> Result<Page<Value>, CivicError> {
    let page = engine
        .list_json(collection, PageRequest::new(offset, limit))
        .await?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(page)
}

/// Persist a region selection. Takes effect at the next startup.
pub async fn run_select(
    config: &CivicConfig,
    selections: &dyn SelectionStore,
    slot: Slot,
    name: &str,
) -> Result<RegionSelection, CivicError> {
    let descriptors = discover_descriptors(Path::new(&config.plugins.directory))?;
    let selection = select_region(selections, &descriptors, slot, name).await?;
    println!("civic: {} region set to {}", selection.slot, selection.name);
    Ok(selection)
}
