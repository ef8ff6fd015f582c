//! Driver reference validation.
//!
//! A driver is resolved in three tiers, each ending the check on success:
//! an absent driver is always accepted (a default is picked later), a built-in
//! driver is accepted without lookup, and anything else must resolve to a
//! non-legacy plugin through the caller's [`PluginGetter`].

use tracing::debug;

use crate::{
    allocator::{DEFAULT_IPAM, is_builtin_driver, is_ipam_plugin_type},
    controlapi::{error::ControlApiError, types::Driver},
    plugins::{LookupMode, PluginGetter},
};

/// Validates an optional driver reference for the given plugin endpoint type.
///
/// # Errors
/// `InvalidArgument` when the driver has no name, is neither built in nor
/// resolvable (no getter, or lookup failure), or resolves to a V1 plugin.
pub fn validate_driver(
    driver: Option<&Driver>,
    plugin_getter: Option<&dyn PluginGetter>,
    plugin_type: &str,
) -> Result<(), ControlApiError> {
    let Some(driver) = driver else {
        return Ok(());
    };
    let name = driver.name.as_str();

    if name.is_empty() {
        return Err(ControlApiError::invalid_argument(
            "driver name: if driver is specified name is required",
        ));
    }

    if is_builtin(name, plugin_type) {
        return Ok(());
    }

    let Some(plugin_getter) = plugin_getter else {
        debug!(name = %name, plugin_type = %plugin_type, "no plugin getter for driver");
        return Err(ControlApiError::invalid_argument(format!("plugin {name} not supported")));
    };

    let plugin = plugin_getter.get(name, plugin_type, LookupMode::Lookup).map_err(|e| {
        debug!(name = %name, error = %e, "driver plugin lookup failed");
        ControlApiError::invalid_argument(format!("error during lookup of plugin {name}"))
    })?;

    if plugin.is_v1() {
        return Err(ControlApiError::invalid_argument(format!(
            "legacy plugin {name} of type {plugin_type} is not supported in swarm mode"
        )));
    }

    Ok(())
}

fn is_builtin(name: &str, plugin_type: &str) -> bool {
    if is_ipam_plugin_type(plugin_type) {
        name.to_lowercase() == DEFAULT_IPAM
    } else {
        is_builtin_driver(name)
    }
}
