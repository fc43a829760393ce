//! Readiness gating: classify server state before any request is attempted

use axon_client::ChatClient;

use crate::error::ErrorKind;

/// Tri-state readiness verdict with diagnostics
///
/// Derived, never persisted; recomputed on every check. Invariant:
/// `ready == (server_healthy && has_models)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    /// Whether the server can serve completions right now
    pub ready: bool,
    /// Whether the server answered the health check
    pub server_healthy: bool,
    /// Whether at least one model is loaded
    pub has_models: bool,
    /// Number of loaded models
    pub model_count: usize,
    /// Classified failure, when not ready
    pub error: Option<ErrorKind>,
    /// Short user-facing message
    pub message: String,
    /// One-line description of server state
    pub status: String,
}

impl Readiness {
    /// Evaluate readiness against the chat capability
    ///
    /// Makes exactly two capability calls (health check, model listing) and
    /// never fails: every underlying error is converted into a verdict here,
    /// so every higher-level operation can gate on a value.
    pub async fn evaluate(client: &dyn ChatClient) -> Self {
        let healthy = match client.is_healthy().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::debug!(error = %e, "health check failed");
                false
            }
        };

        if !healthy {
            return Self::server_unavailable();
        }

        match client.list_models().await {
            Ok(models) if models.is_empty() => Self::no_models(),
            Ok(models) => Self::ready(models.len()),
            Err(e) => {
                tracing::debug!(error = %e, "model listing failed");
                Self::listing_failed(ErrorKind::classify(&e))
            }
        }
    }

    fn ready(model_count: usize) -> Self {
        Self {
            ready: true,
            server_healthy: true,
            has_models: true,
            model_count,
            error: None,
            message: "ready".to_owned(),
            status: format!("server healthy, {model_count} models loaded"),
        }
    }

    fn server_unavailable() -> Self {
        let kind = ErrorKind::ServerUnavailable;
        Self {
            ready: false,
            server_healthy: false,
            has_models: false,
            model_count: 0,
            error: Some(kind),
            message: kind.user_message().to_owned(),
            status: "server unreachable".to_owned(),
        }
    }

    fn no_models() -> Self {
        let kind = ErrorKind::NoModelsLoaded;
        Self {
            ready: false,
            server_healthy: true,
            has_models: false,
            model_count: 0,
            error: Some(kind),
            message: kind.user_message().to_owned(),
            status: "server healthy but no models are loaded".to_owned(),
        }
    }

    fn listing_failed(kind: ErrorKind) -> Self {
        Self {
            ready: false,
            server_healthy: true,
            has_models: false,
            model_count: 0,
            error: Some(kind),
            message: kind.user_message().to_owned(),
            status: "server healthy but the model list could not be fetched".to_owned(),
        }
    }
}
