use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChunkStream, CompletionRequest, CompletionResponse, TextStream, ToolHandler, ToolWorkflowResult};

/// Capability interface for a chat-completion backend
///
/// The orchestration core consumes this trait exclusively; transport,
/// serialization, and wire-protocol details stay behind it. Implementations
/// must be safe to share across concurrent callers.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Whether the server is reachable and answering
    async fn is_healthy(&self) -> Result<bool>;

    /// Identifiers of the models currently available on the server
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Model pinned by a previous [`set_current_model`](Self::set_current_model) call
    ///
    /// Cheap, non-failing accessor.
    fn current_model(&self) -> Option<String>;

    /// Pin the model used when none is resolved explicitly
    ///
    /// Returns `false` (not an error) when the server does not know the model.
    async fn set_current_model(&self, model: &str) -> Result<bool>;

    /// One-shot chat returning the assistant's reply text
    async fn send_message(&self, text: &str, system_prompt: Option<&str>) -> Result<String>;

    /// One-shot chat returning a lazy sequence of reply fragments
    ///
    /// May fail at open or during iteration.
    async fn send_message_stream(&self, text: &str, system_prompt: Option<&str>) -> Result<TextStream>;

    /// Send a completion request
    async fn send_completion(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Send a streaming completion request
    async fn send_completion_stream(&self, request: &CompletionRequest) -> Result<ChunkStream>;

    /// Run the multi-round tool workflow to completion
    async fn execute_tool_workflow(
        &self,
        request: CompletionRequest,
        handler: &dyn ToolHandler,
    ) -> Result<ToolWorkflowResult>;

    /// Base URL of the backing server
    fn base_url(&self) -> &str;

    /// Whether any call has succeeded against the server yet
    fn is_connected(&self) -> bool;
}
