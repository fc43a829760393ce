use axon_client::ClientError;

use crate::readiness::Readiness;

/// Closed classification of chat failures
///
/// Every catch site in the orchestration layer maps capability errors
/// through [`ErrorKind::classify`]; the mapping lives nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server cannot be reached
    ServerUnavailable,
    /// The server is up but has no models loaded
    NoModelsLoaded,
    /// The requested model does not exist on the server
    ModelNotFound,
    /// The server rejected the request
    InvalidRequest,
    /// Anything else
    Unknown,
}

impl ErrorKind {
    /// Fixed user-facing message for this kind, suitable for direct display
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::ServerUnavailable => "The inference server is not reachable. Is it running?",
            Self::NoModelsLoaded => "The server is running but no models are loaded.",
            Self::ModelNotFound => "The requested model was not found on the server.",
            Self::InvalidRequest => "The server rejected the request as invalid.",
            Self::Unknown => "An unexpected error occurred while talking to the server.",
        }
    }

    /// Classify a capability error into this closed set
    pub fn classify(error: &ClientError) -> Self {
        if error.is_unreachable() {
            return Self::ServerUnavailable;
        }

        match error {
            ClientError::Api { status: 404, message } if message.to_lowercase().contains("model") => {
                Self::ModelNotFound
            }
            ClientError::Api {
                status: 400 | 404 | 422,
                ..
            } => Self::InvalidRequest,
            _ => Self::Unknown,
        }
    }
}

/// Typed failure result carried by service operations
///
/// `message` is short and displayable; `detail` preserves the original error
/// text for diagnostics and is never required for correct behavior.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ChatFailure {
    /// Classified failure kind
    pub kind: ErrorKind,
    /// Short user-facing message
    pub message: String,
    /// Original error text, when the failure came from the capability
    pub detail: Option<String>,
}

impl ChatFailure {
    /// Failure classified from an underlying capability error
    pub fn from_client(error: &ClientError) -> Self {
        let kind = ErrorKind::classify(error);
        Self {
            kind,
            message: kind.user_message().to_owned(),
            detail: Some(error.to_string()),
        }
    }

    /// Failure carrying a not-ready verdict's diagnostics
    pub fn not_ready(verdict: &Readiness) -> Self {
        Self {
            kind: verdict.error.unwrap_or(ErrorKind::Unknown),
            message: verdict.message.clone(),
            detail: None,
        }
    }

    /// The model-resolution precondition failure
    pub fn no_model_available() -> Self {
        Self {
            kind: ErrorKind::NoModelsLoaded,
            message: "no model available on the server".to_owned(),
            detail: None,
        }
    }
}
