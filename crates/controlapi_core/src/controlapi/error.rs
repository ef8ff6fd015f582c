use thiserror::Error;
use tonic::Status;

/// Rejection raised by the control API admission checks.
///
/// Every check is a deterministic input validation, so a single kind is
/// enough: the caller must fix the request and resubmit. Plugin lookup
/// failures are reported through the same kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlApiError {
    #[error("{0}")]
    InvalidArgument(String),
}

impl ControlApiError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Human readable message, as sent to clients.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument(message) => message,
        }
    }
}

/// Converts admission errors to gRPC Status codes for wire transmission.
impl From<ControlApiError> for Status {
    fn from(error: ControlApiError) -> Self {
        match error {
            ControlApiError::InvalidArgument(message) => Status::invalid_argument(message),
        }
    }
}
