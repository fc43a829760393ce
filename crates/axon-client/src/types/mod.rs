//! Wire types for the OpenAI-compatible chat protocol

mod message;
mod request;
mod response;
mod stream;
mod tool;

pub use message::{FunctionCall, Message, Role, ToolCall};
pub use request::{CompletionRequest, JsonSchemaFormat, ResponseFormat};
pub use response::{Choice, CompletionResponse, ModelInfo, ModelList, ResponseMessage};
pub use stream::{ChunkStream, StreamChoice, StreamChunk, StreamDelta, TextStream};
pub use tool::{FunctionDefinition, ToolDefinition, ToolHandler, ToolWorkflowResult};
