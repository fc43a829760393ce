/// Client-specific result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from the chat client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("server returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable error message
        message: String,
    },

    /// Failed to parse a response
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Stream encountered an error mid-flight
    #[error("stream error: {0}")]
    Stream(String),

    /// Invalid client configuration or local precondition
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether the error indicates the server cannot be reached at all
    ///
    /// Covers transport-level connect and timeout failures as well as
    /// gateway statuses that stand in for an unreachable upstream.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            Self::Api { status, .. } => matches!(status, 502 | 503 | 504),
            Self::Parse(_) | Self::Stream(_) | Self::Config(_) => false,
        }
    }
}
