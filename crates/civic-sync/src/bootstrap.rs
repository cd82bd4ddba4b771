// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup: choose the local and federal descriptors, resolve the federal
//! configuration against the local one, then load and register both slots.
//!
//! Discovery and selection-store failures abort startup. A plugin that fails
//! to load is reported and leaves its slot without an active plugin; the
//! other slot is still attempted.

use std::path::Path;

use chrono::Utc;
use civic_config::CivicConfig;
use civic_core::descriptor::RegionPluginDescriptor;
use civic_core::traits::SelectionStore;
use civic_core::types::{RegionSelection, Slot};
use civic_core::CivicError;
use civic_plugin::{PluginLoader, PluginRegistry, discover_descriptors, find_descriptor, resolve_federal};
use serde::Serialize;
use tracing::{error, info, warn};

/// What happened to one slot during startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SlotOutcome {
    Registered { name: String },
    Failed { name: String, error: String },
    /// No descriptor was selected for the slot.
    Absent,
}

impl SlotOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, SlotOutcome::Registered { .. })
    }
}

/// Summary of a startup run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupReport {
    pub discovered: usize,
    pub local: SlotOutcome,
    pub federal: SlotOutcome,
    pub warnings: Vec<String>,
}

/// Collaborators needed at startup.
pub struct Bootstrap<'a> {
    pub config: &'a CivicConfig,
    pub selections: &'a dyn SelectionStore,
    pub loader: &'a PluginLoader,
    pub registry: &'a PluginRegistry,
}

impl Bootstrap<'_> {
    pub async fn run(&self) -> Result<StartupReport, CivicError> {
        let plugins = &self.config.plugins;
        let descriptors = discover_descriptors(Path::new(&plugins.directory))?;
        let mut warnings = Vec::new();

        let local = self.select_local(&descriptors, &mut warnings).await?;
        let federal = self.select_federal(&descriptors, &mut warnings).await?;

        let local_outcome = match &local {
            Some(descriptor) => self.install(Slot::Local, descriptor).await,
            None => SlotOutcome::Absent,
        };

        let federal_outcome = match &federal {
            Some(descriptor) => {
                if local.is_none() {
                    warnings.push(format!(
                        "no active local region; `{}` configuration left unresolved",
                        descriptor.name
                    ));
                }
                let resolution = resolve_federal(descriptor, local.as_ref().map(|d| &d.config))?;
                if local.is_some() && !resolution.unresolved.is_empty() {
                    warnings.push(format!(
                        "`{}` references undefined tokens: {}",
                        descriptor.name,
                        resolution.unresolved.join(", ")
                    ));
                }
                self.install(Slot::Federal, &resolution.descriptor).await
            }
            None => SlotOutcome::Absent,
        };

        let report = StartupReport {
            discovered: descriptors.len(),
            local: local_outcome,
            federal: federal_outcome,
            warnings,
        };
        info!(
            discovered = report.discovered,
            local = report.local.is_registered(),
            federal = report.federal.is_registered(),
            warnings = report.warnings.len(),
            "startup complete"
        );
        Ok(report)
    }

    /// The persisted active selection wins; otherwise the configured
    /// `local_region` is selected and persisted.
    async fn select_local(
        &self,
        descriptors: &[RegionPluginDescriptor],
        warnings: &mut Vec<String>,
    ) -> Result<Option<RegionPluginDescriptor>, CivicError> {
        if let Some(selection) = self.selections.find_active_local().await? {
            return Ok(self.descriptor_for(&selection, descriptors, warnings));
        }

        let Some(name) = &self.config.plugins.local_region else {
            warn!("no local region selected");
            warnings.push("no local region selected".to_string());
            return Ok(None);
        };
        let Some(descriptor) = find_descriptor(descriptors, name) else {
            let message = format!("configured local region `{name}` was not discovered");
            warn!(region = %name, "configured local region was not discovered");
            warnings.push(message);
            return Ok(None);
        };

        self.selections
            .upsert(&selection_for(Slot::Local, descriptor)?)
            .await?;
        info!(region = %name, "local region selected from configuration");
        Ok(Some(descriptor.clone()))
    }

    /// The persisted federal selection wins; otherwise the configured
    /// `plugins.federal` descriptor is selected and persisted.
    async fn select_federal(
        &self,
        descriptors: &[RegionPluginDescriptor],
        warnings: &mut Vec<String>,
    ) -> Result<Option<RegionPluginDescriptor>, CivicError> {
        if let Some(selection) = self.selections.find_federal().await? {
            return Ok(self.descriptor_for(&selection, descriptors, warnings));
        }

        let name = &self.config.plugins.federal;
        let Some(descriptor) = find_descriptor(descriptors, name) else {
            warn!(plugin = %name, "federal plugin was not discovered");
            warnings.push(format!("federal plugin `{name}` was not discovered"));
            return Ok(None);
        };

        self.selections
            .upsert(&selection_for(Slot::Federal, descriptor)?)
            .await?;
        info!(plugin = %name, "federal plugin selected from configuration");
        Ok(Some(descriptor.clone()))
    }

    /// Prefer the discovered descriptor for a persisted selection, falling
    /// back to its stored snapshot.
    fn descriptor_for(
        &self,
        selection: &RegionSelection,
        descriptors: &[RegionPluginDescriptor],
        warnings: &mut Vec<String>,
    ) -> Option<RegionPluginDescriptor> {
        if let Some(descriptor) = find_descriptor(descriptors, &selection.name) {
            return Some(descriptor.clone());
        }
        match serde_json::from_value(selection.descriptor.clone()) {
            Ok(descriptor) => {
                info!(slot = %selection.slot, plugin = %selection.name, "using persisted descriptor snapshot");
                Some(descriptor)
            }
            Err(e) => {
                warn!(
                    slot = %selection.slot,
                    plugin = %selection.name,
                    error = %e,
                    "persisted descriptor snapshot is unreadable"
                );
                warnings.push(format!(
                    "persisted {} selection `{}` is unreadable: {e}",
                    selection.slot, selection.name
                ));
                None
            }
        }
    }

    async fn install(&self, slot: Slot, descriptor: &RegionPluginDescriptor) -> SlotOutcome {
        let loaded = match slot {
            Slot::Local => self.loader.load_plugin(descriptor),
            Slot::Federal => self.loader.load_federal_plugin(descriptor),
        };
        let outcome = match loaded {
            Ok(instance) => {
                self.registry
                    .register(slot, &descriptor.name, instance, Some(&descriptor.config))
                    .await
            }
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => SlotOutcome::Registered {
                name: descriptor.name.clone(),
            },
            Err(e) => {
                error!(slot = %slot, plugin = %descriptor.name, error = %e, "plugin failed to load");
                SlotOutcome::Failed {
                    name: descriptor.name.clone(),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Persist `name` as the active selection for `slot`.
///
/// Fails when `name` is not among `descriptors`.
pub async fn select_region(
    selections: &dyn SelectionStore,
    descriptors: &[RegionPluginDescriptor],
    slot: Slot,
    name: &str,
) -> Result<RegionSelection, CivicError> {
    let descriptor = find_descriptor(descriptors, name)
        .ok_or_else(|| CivicError::Config(format!("no plugin named `{name}` was discovered")))?;
    let selection = selection_for(slot, descriptor)?;
    selections.upsert(&selection).await?;
    info!(slot = %slot, plugin = %name, "region selected");
    Ok(selection)
}

fn selection_for(slot: Slot, descriptor: &RegionPluginDescriptor) -> Result<RegionSelection, CivicError> {
    Ok(RegionSelection {
        slot,
        name: descriptor.name.clone(),
        descriptor: serde_json::to_value(descriptor)?,
        active: true,
        updated_at: Utc::now(),
    })
}

/// Run startup with the given collaborators.
pub async fn bootstrap(
    config: &CivicConfig,
    selections: &dyn SelectionStore,
    loader: &PluginLoader,
    registry: &PluginRegistry,
) -> Result<StartupReport, CivicError> {
    Bootstrap {
        config,
        selections,
        loader,
        registry,
    }
    .run()
    .await
}
