// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./civic.toml` > `~/.config/civic/civic.toml` > `/etc/civic/civic.toml`
//! with environment variable overrides via `CIVIC_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CivicConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/civic/civic.toml`
/// 3. `~/.config/civic/civic.toml`
/// 4. `./civic.toml`
/// 5. `CIVIC_*` environment variables
pub fn load_config() -> Result<CivicConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<CivicConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CivicConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CivicConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CivicConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CivicConfig::default()))
        .merge(Toml::file("/etc/civic/civic.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("civic/civic.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("civic.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// `Env::split("_")` would turn `CIVIC_PLUGINS_LOCAL_REGION` into
/// `plugins.local.region`; only the first segment names the section.
fn env_provider() -> Env {
    Env::prefixed("CIVIC_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("log_", "log.", 1)
            .replacen("plugins_", "plugins.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("sync_", "sync.", 1);
        mapped.into()
    })
}
