// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Region plugin discovery, placeholder resolution, loading, and registry.
//!
//! Plugins are described by data files in a plugin directory. Discovery turns
//! those files into validated descriptors, the loader turns descriptors into
//! instances, and the registry holds at most one local and one federal
//! instance at a time.

pub mod declarative;
pub mod discovery;
pub mod loader;
pub mod placeholder;
pub mod registry;

pub use declarative::DeclarativePlugin;
pub use discovery::{discover_descriptors, find_descriptor, load_descriptor_file, validate_descriptor};
pub use loader::{DeclarativeFactory, PluginFactory, PluginLoader};
pub use placeholder::{
    FederalResolution, Substitutions, resolve, resolve_config, resolve_federal,
    substitutions_from, unresolved_tokens,
};
pub use registry::{PluginRegistry, PluginStatus, PluginSummary, RegisteredPlugin, RegistryHealth};
