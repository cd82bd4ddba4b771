// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin instantiation from descriptors.
//!
//! Loading only builds an instance; initialization happens when the instance
//! is registered into a slot. Descriptors are declarative by default, and a
//! named factory can take over a descriptor that needs code of its own.

use std::collections::HashMap;
use std::sync::Arc;

use civic_core::descriptor::RegionPluginDescriptor;
use civic_core::traits::{RegionPlugin, SourceFetcher};
use civic_core::types::Slot;
use civic_core::CivicError;
use tracing::debug;

use crate::declarative::DeclarativePlugin;

/// Factory trait for creating region plugin instances from a descriptor.
pub trait PluginFactory: Send + Sync {
    /// Create a new, uninitialized instance.
    fn create(&self, descriptor: &RegionPluginDescriptor) -> Result<Arc<dyn RegionPlugin>, CivicError>;
}

/// Builds [`DeclarativePlugin`]s sharing one source fetcher.
pub struct DeclarativeFactory {
    fetcher: Arc<dyn SourceFetcher>,
}

impl DeclarativeFactory {
    pub fn new(fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self { fetcher }
    }
}

impl PluginFactory for DeclarativeFactory {
    fn create(&self, descriptor: &RegionPluginDescriptor) -> Result<Arc<dyn RegionPlugin>, CivicError> {
        Ok(Arc::new(DeclarativePlugin::new(
            descriptor.clone(),
            Arc::clone(&self.fetcher),
        )))
    }
}

/// Turns descriptors into plugin instances.
pub struct PluginLoader {
    default_factory: Arc<dyn PluginFactory>,
    factories: HashMap<String, Arc<dyn PluginFactory>>,
}

impl PluginLoader {
    /// A loader that builds declarative plugins for every descriptor.
    pub fn new(fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self::with_default_factory(Arc::new(DeclarativeFactory::new(fetcher)))
    }

    pub fn with_default_factory(factory: Arc<dyn PluginFactory>) -> Self {
        Self {
            default_factory: factory,
            factories: HashMap::new(),
        }
    }

    /// Route descriptors named `name` to `factory` instead of the default.
    pub fn with_factory(mut self, name: impl Into<String>, factory: Arc<dyn PluginFactory>) -> Self {
        self.factories.insert(name.into(), factory);
        self
    }

    /// Instantiate a local region plugin.
    pub fn load_plugin(&self, descriptor: &RegionPluginDescriptor) -> Result<Arc<dyn RegionPlugin>, CivicError> {
        self.load(Slot::Local, descriptor)
    }

    /// Instantiate the federal plugin from an already-resolved descriptor.
    pub fn load_federal_plugin(
        &self,
        descriptor: &RegionPluginDescriptor,
    ) -> Result<Arc<dyn RegionPlugin>, CivicError> {
        self.load(Slot::Federal, descriptor)
    }

    fn load(&self, slot: Slot, descriptor: &RegionPluginDescriptor) -> Result<Arc<dyn RegionPlugin>, CivicError> {
        let load_error = |message: String| CivicError::PluginLoad {
            name: descriptor.name.clone(),
            message,
        };
        if descriptor.config.data_sources.is_empty() {
            return Err(load_error("descriptor has no data sources".to_string()));
        }

        let factory = self
            .factories
            .get(&descriptor.name)
            .unwrap_or(&self.default_factory);
        let instance = factory.create(descriptor).map_err(|e| match e {
            CivicError::PluginLoad { .. } => e,
            other => load_error(other.to_string()),
        })?;

        debug!(
            slot = %slot,
            plugin = %descriptor.name,
            version = %descriptor.version,
            "plugin instantiated"
        );
        Ok(instance)
    }
}

impl std::fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut named: Vec<_> = self.factories.keys().collect();
        named.sort();
        f.debug_struct("PluginLoader")
            .field("named_factories", &named)
            .finish_non_exhaustive()
    }
}
