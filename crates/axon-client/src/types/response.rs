use serde::{Deserialize, Serialize};

use super::message::{Role, ToolCall};

/// Completion response from the inference server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Model that produced the response
    #[serde(default)]
    pub model: String,
    /// Response choices; the first is the reply
    pub choices: Vec<Choice>,
}

impl CompletionResponse {
    /// Response with a single assistant text choice
    pub fn from_text(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: Role::Assistant,
                    content: Some(content.into()),
                    tool_calls: None,
                },
                finish_reason: Some("stop".to_owned()),
            }],
        }
    }

    /// Content of the first choice, if any
    pub fn content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.content.as_deref())
    }
}

/// One response choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    /// Choice index
    #[serde(default)]
    pub index: u32,
    /// The reply message
    pub message: ResponseMessage,
    /// Reason generation finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Assistant message within a response choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// Role of the author (always assistant in practice)
    pub role: Role,
    /// Reply text; absent when the reply is a pure tool call
    #[serde(default)]
    pub content: Option<String>,
    /// Tool calls requested by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// `GET /models` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    /// Available models
    pub data: Vec<ModelInfo>,
}

/// One entry in the model list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier
    pub id: String,
}
