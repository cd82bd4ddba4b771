// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sync engine for the Civic ingestion core.
//!
//! Startup wiring ([`bootstrap`]), reconciliation of plugin output into a
//! record store ([`SyncEngine`]), paginated read accessors, and a scheduled
//! runner ([`SyncRunner`]).

pub mod bootstrap;
pub mod engine;
pub mod reads;
pub mod runner;

pub use bootstrap::{Bootstrap, SlotOutcome, StartupReport, bootstrap, select_region};
pub use engine::{NO_LOCAL_PLUGIN, SyncEngine};
pub use runner::SyncRunner;
