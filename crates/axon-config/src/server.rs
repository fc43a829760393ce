use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Inference server endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL of the OpenAI-compatible API (e.g. `http://localhost:11434/v1`)
    pub base_url: Url,
    /// API key sent as a bearer token, if the server requires one
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl ServerConfig {
    /// Configuration pointing at a base URL with all other fields defaulted
    pub fn for_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

fn default_request_timeout_seconds() -> u64 {
    120
}
