use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::ToolCall;

/// Definition of a tool the model may call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool kind; always `"function"`
    #[serde(rename = "type")]
    pub kind: String,
    /// The callable function
    pub function: FunctionDefinition,
}

impl ToolDefinition {
    /// Function tool with the given name, description, and JSON-schema parameters
    pub fn function(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            kind: "function".to_owned(),
            function: FunctionDefinition {
                name: name.into(),
                description: Some(description.into()),
                parameters,
            },
        }
    }
}

/// Function signature within a tool definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Function name
    pub name: String,
    /// What the function does, for the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema of the arguments object
    pub parameters: Value,
}

/// Outcome of a multi-round tool workflow
#[derive(Debug, Clone)]
pub struct ToolWorkflowResult {
    /// Whether the workflow reached a final answer
    pub success: bool,
    /// The model's final reply text (empty on failure)
    pub final_response: String,
    /// Tool calls executed, in invocation order
    pub executed_tool_calls: Vec<ToolCall>,
    /// Why the workflow failed, when it did
    pub error_message: Option<String>,
}

impl ToolWorkflowResult {
    /// Failed workflow carrying the given message and no executed calls
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            final_response: String::new(),
            executed_tool_calls: Vec::new(),
            error_message: Some(message.into()),
        }
    }
}

/// Caller-supplied executor for tool calls requested by the model
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the named tool with JSON-encoded arguments and return its output
    ///
    /// Errors are reported back to the model as the tool's output rather than
    /// aborting the workflow.
    async fn handle(&self, name: &str, arguments: &str) -> anyhow::Result<String>;
}
