// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Civic ingestion core.
//!
//! Provides the error type, civic record and descriptor types, and the
//! collaborator traits (region plugins, record storage, selection storage)
//! shared by every crate in the workspace.

pub mod descriptor;
pub mod error;
pub mod records;
pub mod traits;
pub mod types;

pub use descriptor::{DataSource, DeclarativeRegionConfig, RateLimit, RegionPluginDescriptor, SourceType};
pub use error::CivicError;
pub use records::{
    CampaignFinanceData, Committee, Contribution, Expenditure, ExternalRecord,
    IndependentExpenditure, Meeting, Money, Persisted, Proposition, Representative,
};
pub use traits::{
    CampaignFinanceSource, RecordStore, RecordUpsert, RegionPlugin, SelectionStore,
    SourceFetcher, StoredRecord,
};
pub use types::{
    Collection, DataType, Page, PageRequest, PluginHealth, RegionInfo, RegionSelection, Slot,
    SyncResult,
};
