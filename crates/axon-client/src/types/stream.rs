use std::pin::Pin;

use futures_util::Stream;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Lazy sequence of streaming completion chunks
///
/// Finite and non-restartable; pull-time failures surface as `Err` items.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, ClientError>> + Send>>;

/// Lazy sequence of reply-text fragments
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, ClientError>> + Send>>;

/// One chunk of a streaming completion (`chat.completion.chunk`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Chunk choices; the first carries the delta
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

impl StreamChunk {
    /// Chunk carrying a single content fragment
    pub fn of_content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![StreamChoice {
                delta: StreamDelta {
                    content: Some(content.into()),
                },
                finish_reason: None,
            }],
        }
    }

    /// Delta content of the first choice, if any
    pub fn content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.delta.content.as_deref())
    }
}

/// One choice within a stream chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChoice {
    /// Incremental update
    #[serde(default)]
    pub delta: StreamDelta,
    /// Reason generation finished (present on the final delta)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Incremental update within a streaming response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamDelta {
    /// Incremental text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
