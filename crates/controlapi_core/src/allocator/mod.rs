//! Built-in network and IPAM driver names known to the network allocator.
//!
//! Drivers listed here are served by the allocator itself and never need a
//! plugin lookup.

/// Plugin endpoint type of network drivers.
pub const NETWORK_PLUGIN_ENDPOINT_TYPE: &str = "NetworkDriver";

/// Plugin endpoint type of IPAM drivers.
pub const IPAM_PLUGIN_ENDPOINT_TYPE: &str = "IpamDriver";

/// Name of the built-in IPAM driver, compared case-insensitively.
pub const DEFAULT_IPAM: &str = "default";

/// Network drivers the allocator initializes without plugins.
pub const BUILTIN_NETWORK_DRIVERS: &[&str] = &["overlay", "macvlan", "bridge", "ipvlan", "host"];

/// Returns `true` if `name` is a network driver built into the allocator.
pub fn is_builtin_driver(name: &str) -> bool {
    BUILTIN_NETWORK_DRIVERS.contains(&name)
}

/// Returns `true` if `plugin_type` designates IPAM drivers.
pub fn is_ipam_plugin_type(plugin_type: &str) -> bool {
    plugin_type == IPAM_PLUGIN_ENDPOINT_TYPE
}
