// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dual-slot plugin registry.
//!
//! The registry holds at most one local plugin and one federal plugin. Each
//! occupied slot records whether initialization succeeded; only `Active`
//! entries are ever handed out to callers. Slot mutations are serialized by
//! the write lock, so a slot is never observed half-replaced.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use civic_core::descriptor::DeclarativeRegionConfig;
use civic_core::traits::RegionPlugin;
use civic_core::types::{PluginHealth, Slot};
use civic_core::CivicError;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Status of a plugin held in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginStatus {
    /// Initialized and available to sync.
    Active,
    /// Initialization failed; kept for reporting only.
    Error,
}

impl std::fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginStatus::Active => write!(f, "active"),
            PluginStatus::Error => write!(f, "error"),
        }
    }
}

/// A plugin occupying a slot.
pub struct RegisteredPlugin {
    pub name: String,
    pub instance: Arc<dyn RegionPlugin>,
    pub status: PluginStatus,
    pub last_error: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

impl std::fmt::Debug for RegisteredPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredPlugin")
            .field("name", &self.name)
            .field("status", &self.status)
            .field("last_error", &self.last_error)
            .field("loaded_at", &self.loaded_at)
            .finish_non_exhaustive()
    }
}

/// Read-only snapshot of one slot, for listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSummary {
    pub slot: Slot,
    pub name: String,
    pub version: String,
    pub status: PluginStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

/// Health of both slots. An empty slot reports `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryHealth {
    pub local: Option<PluginHealth>,
    pub federal: Option<PluginHealth>,
}

#[derive(Default)]
struct Slots {
    local: Option<RegisteredPlugin>,
    federal: Option<RegisteredPlugin>,
}

impl Slots {
    fn get(&self, slot: Slot) -> Option<&RegisteredPlugin> {
        match slot {
            Slot::Local => self.local.as_ref(),
            Slot::Federal => self.federal.as_ref(),
        }
    }

    fn get_mut(&mut self, slot: Slot) -> &mut Option<RegisteredPlugin> {
        match slot {
            Slot::Local => &mut self.local,
            Slot::Federal => &mut self.federal,
        }
    }
}

/// Registry of the local and federal plugin slots.
#[derive(Default)]
pub struct PluginRegistry {
    slots: RwLock<Slots>,
}

impl PluginRegistry {
    /// Create a new registry with both slots empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `instance` into `slot`, replacing any previous occupant.
    ///
    /// The previous occupant is destroyed first. On initialization failure
    /// the slot records the plugin as `Error` and the failure is returned as
    /// [`CivicError::PluginLoad`].
    pub async fn register(
        &self,
        slot: Slot,
        name: &str,
        instance: Arc<dyn RegionPlugin>,
        config: Option<&DeclarativeRegionConfig>,
    ) -> Result<(), CivicError> {
        let mut slots = self.slots.write().await;
        if let Some(previous) = slots.get_mut(slot).take() {
            destroy_entry(slot, previous).await;
        }

        let outcome = instance.initialize(config).await;
        let (status, last_error) = match &outcome {
            Ok(()) => (PluginStatus::Active, None),
            Err(e) => (PluginStatus::Error, Some(e.to_string())),
        };
        *slots.get_mut(slot) = Some(RegisteredPlugin {
            name: name.to_string(),
            instance,
            status,
            last_error,
            loaded_at: Utc::now(),
        });
        drop(slots);

        match outcome {
            Ok(()) => {
                info!(slot = %slot, plugin = %name, "plugin registered");
                Ok(())
            }
            Err(e) => {
                error!(slot = %slot, plugin = %name, error = %e, "plugin initialization failed");
                Err(match e {
                    CivicError::PluginLoad { .. } => e,
                    other => CivicError::PluginLoad {
                        name: name.to_string(),
                        message: other.to_string(),
                    },
                })
            }
        }
    }

    /// Empty `slot`, destroying its occupant. Returns whether anything was removed.
    ///
    /// Destroy failures are logged and swallowed.
    pub async fn unregister(&self, slot: Slot) -> bool {
        let mut slots = self.slots.write().await;
        match slots.get_mut(slot).take() {
            Some(entry) => {
                destroy_entry(slot, entry).await;
                true
            }
            None => false,
        }
    }

    /// Empty both slots.
    pub async fn teardown(&self) {
        self.unregister(Slot::Local).await;
        self.unregister(Slot::Federal).await;
    }

    /// The plugin in `slot`, if it is `Active`.
    pub async fn get(&self, slot: Slot) -> Option<Arc<dyn RegionPlugin>> {
        self.slots
            .read()
            .await
            .get(slot)
            .filter(|entry| entry.status == PluginStatus::Active)
            .map(|entry| Arc::clone(&entry.instance))
    }

    pub async fn get_local(&self) -> Option<Arc<dyn RegionPlugin>> {
        self.get(Slot::Local).await
    }

    pub async fn get_federal(&self) -> Option<Arc<dyn RegionPlugin>> {
        self.get(Slot::Federal).await
    }

    /// Every `Active` plugin, local first.
    pub async fn get_all(&self) -> Vec<Arc<dyn RegionPlugin>> {
        let slots = self.slots.read().await;
        [Slot::Local, Slot::Federal]
            .into_iter()
            .filter_map(|slot| slots.get(slot))
            .filter(|entry| entry.status == PluginStatus::Active)
            .map(|entry| Arc::clone(&entry.instance))
            .collect()
    }

    pub async fn status(&self, slot: Slot) -> Option<PluginStatus> {
        self.slots.read().await.get(slot).map(|entry| entry.status)
    }

    /// Health of the plugin in `slot`.
    ///
    /// An `Error` entry reports its initialization failure. A failing or
    /// erroring health check is reported as unhealthy, never propagated.
    pub async fn health(&self, slot: Slot) -> Option<PluginHealth> {
        let (instance, status, last_error) = {
            let slots = self.slots.read().await;
            let entry = slots.get(slot)?;
            (
                Arc::clone(&entry.instance),
                entry.status,
                entry.last_error.clone(),
            )
        };

        if status == PluginStatus::Error {
            return Some(PluginHealth::unhealthy(
                last_error.unwrap_or_else(|| "initialization failed".to_string()),
            ));
        }
        Some(match instance.health_check().await {
            Ok(health) => health,
            Err(e) => PluginHealth::unhealthy(e.to_string()),
        })
    }

    pub async fn get_health(&self) -> RegistryHealth {
        RegistryHealth {
            local: self.health(Slot::Local).await,
            federal: self.health(Slot::Federal).await,
        }
    }

    /// Snapshot of every occupied slot, local first.
    pub async fn summaries(&self) -> Vec<PluginSummary> {
        let slots = self.slots.read().await;
        [Slot::Local, Slot::Federal]
            .into_iter()
            .filter_map(|slot| {
                slots.get(slot).map(|entry| PluginSummary {
                    slot,
                    name: entry.name.clone(),
                    version: entry.instance.version().to_string(),
                    status: entry.status,
                    last_error: entry.last_error.clone(),
                    loaded_at: entry.loaded_at,
                })
            })
            .collect()
    }
}

async fn destroy_entry(slot: Slot, entry: RegisteredPlugin) {
    match entry.instance.destroy().await {
        Ok(()) => info!(slot = %slot, plugin = %entry.name, "plugin unregistered"),
        Err(e) => warn!(
            slot = %slot,
            plugin = %entry.name,
            error = %e,
            "plugin destroy failed, slot cleared anyway"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_test_utils::MockPlugin;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn register_and_get_roundtrip() {
        let registry = PluginRegistry::new();
        let mock = Arc::new(MockPlugin::new("ohio"));
        registry.register(Slot::Local, "ohio", mock.clone(), None).await.unwrap();

        let local = registry.get_local().await.expect("local registered");
        assert_eq!(local.name(), "ohio");
        assert!(registry.get_federal().await.is_none());
        assert_eq!(mock.initialize_calls(), 1);
        assert_eq!(registry.status(Slot::Local).await, Some(PluginStatus::Active));
    }

    #[tokio::test]
    async fn replacing_a_slot_destroys_previous_once() {
        let registry = PluginRegistry::new();
        let first = Arc::new(MockPlugin::new("first"));
        let second = Arc::new(MockPlugin::new("second"));

        registry.register(Slot::Local, "first", first.clone(), None).await.unwrap();
        registry.register(Slot::Local, "second", second.clone(), None).await.unwrap();

        assert_eq!(first.destroy_calls(), 1);
        assert_eq!(second.destroy_calls(), 0);
        assert_eq!(registry.get_local().await.unwrap().name(), "second");
    }

    #[tokio::test]
    async fn failed_initialize_is_recorded_but_never_returned() {
        let registry = PluginRegistry::new();
        let broken = Arc::new(MockPlugin::new("broken").failing_initialize("bad credentials"));

        let err = registry
            .register(Slot::Federal, "broken", broken, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CivicError::PluginLoad { ref name, .. } if name == "broken"));

        assert!(registry.get_federal().await.is_none());
        assert!(registry.get_all().await.is_empty());
        assert_eq!(registry.status(Slot::Federal).await, Some(PluginStatus::Error));

        let health = registry.health(Slot::Federal).await.unwrap();
        assert!(!health.healthy);
        assert!(health.message.contains("bad credentials"));
    }

    #[tokio::test]
    async fn get_all_orders_local_before_federal() {
        let registry = PluginRegistry::new();
        registry
            .register(Slot::Federal, "federal", Arc::new(MockPlugin::new("federal")), None)
            .await
            .unwrap();
        registry
            .register(Slot::Local, "ohio", Arc::new(MockPlugin::new("ohio")), None)
            .await
            .unwrap();

        let names: Vec<String> = registry
            .get_all()
            .await
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["ohio", "federal"]);
    }

    #[traced_test]
    #[tokio::test]
    async fn unregister_is_idempotent_and_swallows_destroy_errors() {
        let registry = PluginRegistry::new();
        let mock = Arc::new(MockPlugin::new("ohio").failing_destroy("socket already closed"));
        registry.register(Slot::Local, "ohio", mock.clone(), None).await.unwrap();

        assert!(registry.unregister(Slot::Local).await);
        assert!(!registry.unregister(Slot::Local).await);
        assert_eq!(mock.destroy_calls(), 1);
        assert!(registry.get_local().await.is_none());
        assert!(logs_contain("plugin destroy failed"));
    }

    #[tokio::test]
    async fn health_check_errors_become_unhealthy() {
        let registry = PluginRegistry::new();
        let mock = Arc::new(MockPlugin::new("ohio").failing_health("probe timed out"));
        registry.register(Slot::Local, "ohio", mock, None).await.unwrap();

        let health = registry.get_health().await;
        let local = health.local.expect("local health");
        assert!(!local.healthy);
        assert!(local.message.contains("probe timed out"));
        assert!(health.federal.is_none());
    }

    #[tokio::test]
    async fn summaries_list_occupied_slots() {
        let registry = PluginRegistry::new();
        registry
            .register(Slot::Local, "ohio", Arc::new(MockPlugin::new("ohio")), None)
            .await
            .unwrap();
        let _ = registry
            .register(
                Slot::Federal,
                "federal",
                Arc::new(MockPlugin::new("federal").failing_initialize("down")),
                None,
            )
            .await;

        let summaries = registry.summaries().await;
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].slot, Slot::Local);
        assert_eq!(summaries[0].status, PluginStatus::Active);
        assert_eq!(summaries[1].status, PluginStatus::Error);
        assert_eq!(summaries[1].last_error.as_deref().map(|m| m.contains("down")), Some(true));
    }

    #[tokio::test]
    async fn teardown_destroys_both_slots() {
        let registry = PluginRegistry::new();
        let local = Arc::new(MockPlugin::new("ohio"));
        let federal = Arc::new(MockPlugin::new("federal"));
        registry.register(Slot::Local, "ohio", local.clone(), None).await.unwrap();
        registry.register(Slot::Federal, "federal", federal.clone(), None).await.unwrap();

        registry.teardown().await;
        assert_eq!(local.destroy_calls(), 1);
        assert_eq!(federal.destroy_calls(), 1);
        assert!(registry.summaries().await.is_empty());
    }
}
