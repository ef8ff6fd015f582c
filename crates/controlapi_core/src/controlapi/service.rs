use std::{future::Future, pin::Pin, sync::Arc, task::Poll};

use tower::Service;
use tracing::{debug, info};

use crate::{
    allocator::{IPAM_PLUGIN_ENDPOINT_TYPE, NETWORK_PLUGIN_ENDPOINT_TYPE},
    controlapi::{
        driver::validate_driver,
        error::ControlApiError,
        types::{ValidationRequest, ValidationResponse},
        validation::{validate_annotations, validate_config_or_secret_annotations},
    },
    plugins::PluginGetter,
};

/// Admission checks of the control API, per object kind.
///
/// Handlers call this service before persisting a created or updated object.
/// The plugin getter is optional; without one, only built-in drivers are
/// accepted for networks.
#[derive(Clone, Default)]
pub struct ValidationService {
    plugin_getter: Option<Arc<dyn PluginGetter>>,
}

impl ValidationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves non built-in drivers through `plugin_getter`.
    pub fn with_plugin_getter(mut self, plugin_getter: Arc<dyn PluginGetter>) -> Self {
        self.plugin_getter = Some(plugin_getter);
        self
    }

    /// Runs the checks for `request` synchronously.
    pub fn validate(&self, request: &ValidationRequest) -> Result<(), ControlApiError> {
        let plugin_getter = self.plugin_getter.as_deref();
        match request {
            ValidationRequest::Service { annotations } | ValidationRequest::Task { annotations } => {
                validate_annotations(annotations)
            }
            ValidationRequest::Network { annotations, driver, ipam } => {
                validate_annotations(annotations)?;
                validate_driver(driver.as_ref(), plugin_getter, NETWORK_PLUGIN_ENDPOINT_TYPE)?;
                let ipam_driver = ipam.as_ref().and_then(|ipam| ipam.driver.as_ref());
                validate_driver(ipam_driver, plugin_getter, IPAM_PLUGIN_ENDPOINT_TYPE)
            }
            ValidationRequest::Secret { annotations } | ValidationRequest::Config { annotations } => {
                validate_config_or_secret_annotations(annotations)
            }
        }
    }
}

impl std::fmt::Debug for ValidationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationService")
            .field("plugin_getter", &self.plugin_getter.is_some())
            .finish()
    }
}

impl Service<ValidationRequest> for ValidationService {
    type Response = ValidationResponse;
    type Error = ControlApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: ValidationRequest) -> Self::Future {
        let result = self.validate(&request);
        let kind = request.kind();
        let name = request.annotations().name.clone();
        Box::pin(async move {
            match result {
                Ok(()) => {
                    info!("[controlapi] admitted {}: {}", kind, name);
                    Ok(ValidationResponse::Ack)
                }
                Err(e) => {
                    debug!("[controlapi] rejected {}: {:?}, {}", kind, name, e);
                    Err(e)
                }
            }
        })
    }
}
