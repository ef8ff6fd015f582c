//! Plugin lookup capability.
//!
//! Driver validation resolves names that are not built in through a
//! [`PluginGetter`]. The getter is owned by the caller and may be absent; this
//! crate only reads from it.
//!
//! [`PluginRegistry`] is an in-process implementation backed by a concurrent
//! map, used by the command line tool and by tests.

use std::{fmt::Debug, sync::Arc};

use dashmap::DashMap;
use thiserror::Error;
use tracing::trace;

/// How a lookup interacts with the plugin's reference count.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum LookupMode {
    /// Resolve without activating or acquiring the plugin
    #[default]
    Lookup,
    /// Resolve and take a reference
    Acquire,
    /// Drop a reference taken by `Acquire`
    Release,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PluginError {
    #[error("plugin {name} of type {plugin_type} not found")]
    NotFound { name: String, plugin_type: String },
}

/// An installed plugin, as seen by admission checks.
pub trait CompatPlugin: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// `true` if the plugin only speaks the legacy V1 protocol.
    fn is_v1(&self) -> bool;
}

/// Resolves a plugin by name and endpoint type.
pub trait PluginGetter: Send + Sync {
    fn get(
        &self,
        name: &str,
        plugin_type: &str,
        mode: LookupMode,
    ) -> Result<Arc<dyn CompatPlugin>, PluginError>;
}

/// Plugin entry of a [`PluginRegistry`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InstalledPlugin {
    name: String,
    v1: bool,
}

impl InstalledPlugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), v1: false }
    }

    /// Marks the plugin as speaking the legacy V1 protocol.
    pub fn legacy(mut self) -> Self {
        self.v1 = true;
        self
    }
}

impl CompatPlugin for InstalledPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_v1(&self) -> bool {
        self.v1
    }
}

/// In-process plugin registry keyed by (name, endpoint type).
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: Arc<DashMap<(String, String), Arc<InstalledPlugin>>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `plugin` for `plugin_type`, replacing any previous entry.
    pub fn install(&self, plugin_type: impl Into<String>, plugin: InstalledPlugin) {
        self.plugins.insert((plugin.name.clone(), plugin_type.into()), Arc::new(plugin));
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl PluginGetter for PluginRegistry {
    fn get(
        &self,
        name: &str,
        plugin_type: &str,
        mode: LookupMode,
    ) -> Result<Arc<dyn CompatPlugin>, PluginError> {
        trace!(name = %name, plugin_type = %plugin_type, ?mode, "plugin lookup");
        match self.plugins.get(&(name.to_string(), plugin_type.to_string())) {
            Some(entry) => Ok(entry.value().clone() as Arc<dyn CompatPlugin>),
            None => Err(PluginError::NotFound {
                name: name.to_string(),
                plugin_type: plugin_type.to_string(),
            }),
        }
    }
}
