//! Control API admission checks and list filters.
//!
//! ## Admission
//!
//! Create and update handlers validate incoming object definitions before
//! they reach the store:
//! - **Names**: [`validation::validate_annotations`] for services, tasks and
//!   networks, [`validation::validate_config_or_secret_annotations`] for
//!   configs and secrets
//! - **Drivers**: [`driver::validate_driver`] for network and IPAM driver
//!   references, resolving plugins through an optional
//!   [`PluginGetter`](crate::plugins::PluginGetter)
//!
//! [`service::ValidationService`] bundles these per object kind behind a
//! `tower::Service`.
//!
//! ## Listing
//!
//! List handlers build one [`By`](crate::store::By) disjunction per
//! filterable field with [`filters::build_filters`], and apply the remaining
//! fields with [`filters::filter_contains`], [`filters::filter_contains_prefix`]
//! and [`filters::filter_match_labels`]. An empty filter always matches.
//!
//! ## Errors
//!
//! Every check fails fast with [`error::ControlApiError::InvalidArgument`].
pub mod driver;
pub mod error;
pub mod filters;
pub mod service;
pub mod types;
pub mod validation;

pub use driver::validate_driver;
pub use error::ControlApiError;
pub use filters::{build_filters, filter_contains, filter_contains_prefix, filter_match_labels};
pub use validation::{validate_annotations, validate_config_or_secret_annotations};
