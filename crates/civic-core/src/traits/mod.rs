// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod plugin;
pub mod storage;

pub use plugin::{CampaignFinanceSource, RegionPlugin, SourceFetcher};
pub use storage::{RecordStore, RecordUpsert, SelectionStore, StoredRecord};
