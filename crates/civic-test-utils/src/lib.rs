// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Civic integration tests.
//!
//! Provides mock plugins, in-memory stores, and fixtures for fast,
//! deterministic tests without upstream services or a database.
//!
//! # Components
//!
//! - [`MockPlugin`] - Region plugin with pre-configured records and failures
//! - [`MemoryRecordStore`] - Record store that counts storage round trips
//! - [`MemorySelectionStore`] - Selection store held in memory
//! - [`StaticFetcher`] - Source fetcher serving canned items by URL

pub mod fixtures;
pub mod memory_store;
pub mod mock_plugin;
pub mod static_fetcher;

pub use memory_store::{MemoryRecordStore, MemorySelectionStore};
pub use mock_plugin::MockPlugin;
pub use static_fetcher::StaticFetcher;
