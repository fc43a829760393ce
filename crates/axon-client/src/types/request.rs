use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::Message;
use super::tool::ToolDefinition;

/// Completion request sent to the inference server
///
/// Built fresh for every turn and never mutated after submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages in order
    pub messages: Vec<Message>,
    /// Whether to stream the response
    #[serde(default)]
    pub stream: bool,
    /// Tool definitions available to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    /// Output-format constraint for structured generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl CompletionRequest {
    /// Non-streaming request with no tools or format constraint
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: false,
            tools: None,
            response_format: None,
        }
    }
}

/// Output-format constraint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Constrain output to a JSON schema
    JsonSchema {
        /// Named schema the output must conform to
        json_schema: JsonSchemaFormat,
    },
}

/// Named JSON schema within a [`ResponseFormat`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchemaFormat {
    /// Schema name reported to the server
    pub name: String,
    /// The JSON schema itself
    pub schema: Value,
}

impl ResponseFormat {
    /// JSON-schema constraint with the given name and schema
    pub fn json_schema(name: impl Into<String>, schema: Value) -> Self {
        Self::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: name.into(),
                schema,
            },
        }
    }
}
