//! Admission validation and list filtering for a cluster control API.
//!
//! This crate holds the checks that every control API handler runs before an
//! object reaches the replicated store, and the predicate combinators that
//! list handlers use to narrow store queries.
//!
//! - [`controlapi`]: name and driver validators, list filter helpers and a
//!   [`tower`] service composing them per object kind
//! - [`store`]: the query predicate model consumed by list handlers
//! - [`plugins`]: the plugin lookup capability and an in-process registry
//! - [`allocator`]: built-in network and IPAM driver names
//!
//! Rejections are reported as [`controlapi::error::ControlApiError`], which
//! converts into a [`tonic::Status`] carrying the `InvalidArgument` code.
//!
//! [`tower`]: https://docs.rs/tower
//! [`tonic::Status`]: https://docs.rs/tonic

pub mod allocator;
pub mod controlapi;
pub mod plugins;
pub mod store;

pub mod controlapi_tracing {
    use std::sync::Once;
    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: Once = Once::new();

    /// Initialize tracing output.
    ///
    /// Installs a `fmt` subscriber filtered by `RUST_LOG`, silent when the
    /// variable is unset. Safe to call from every test and from the binary.
    pub fn init() {
        INIT.call_once(|| {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("off"));

            let _ = fmt()
                .with_target(false)
                .with_test_writer()
                .with_env_filter(filter)
                .try_init();
        });
    }
}
