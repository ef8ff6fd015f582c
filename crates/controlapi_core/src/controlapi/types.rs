//! Control API type definitions.
//!
//! Value types carried by incoming object definitions, and the request and
//! response types of the admission [`ValidationService`].
//!
//! [`ValidationService`]: crate::controlapi::service::ValidationService

use std::collections::HashMap;

/// User supplied metadata attached to every stored object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// Object name, checked before the object is admitted
    pub name: String,
    /// Free form labels, used by list filters
    pub labels: HashMap<String, String>,
}

impl Annotations {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), labels: HashMap::new() }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Reference to a pluggable backend, such as a network or IPAM driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Driver {
    pub name: String,
    /// Driver specific options, opaque to admission checks
    pub options: HashMap<String, String>,
}

impl Driver {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), options: HashMap::new() }
    }
}

/// IPAM configuration of a network spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpamOptions {
    /// Absent means the default IPAM driver is chosen later
    pub driver: Option<Driver>,
}

/// Object definitions submitted for admission.
///
/// Each variant carries the fields the admission checks read for that kind
/// of object; everything else in the definition is ignored here.
#[derive(Debug, Clone)]
pub enum ValidationRequest {
    /// Service spec; the name doubles as a DNS label
    Service { annotations: Annotations },

    /// Task spec
    Task { annotations: Annotations },

    /// Network spec, with its network driver and IPAM configuration.
    Network {
        annotations: Annotations,
        /// Network driver, absent for the default
        driver: Option<Driver>,
        /// IPAM options, absent for the default
        ipam: Option<IpamOptions>,
    },

    /// Secret spec; names may contain dots
    Secret { annotations: Annotations },

    /// Config spec; names may contain dots
    Config { annotations: Annotations },
}

impl ValidationRequest {
    /// Short kind label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Service { .. } => "service",
            Self::Task { .. } => "task",
            Self::Network { .. } => "network",
            Self::Secret { .. } => "secret",
            Self::Config { .. } => "config",
        }
    }

    pub fn annotations(&self) -> &Annotations {
        match self {
            Self::Service { annotations }
            | Self::Task { annotations }
            | Self::Network { annotations, .. }
            | Self::Secret { annotations }
            | Self::Config { annotations } => annotations,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ValidationResponse {
    /// The object definition may be persisted.
    Ack,
}
