#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Chat-completion client capability for Axon
//!
//! Defines the [`ChatClient`] trait consumed by the orchestration core, the
//! wire types of the OpenAI-compatible chat protocol, and an HTTP
//! implementation ([`HttpChatClient`]) with SSE streaming and a bounded
//! multi-round tool-workflow executor.

pub mod client;
pub mod error;
pub mod http;
pub mod types;
pub mod workflow;

pub use client::ChatClient;
pub use error::{ClientError, Result};
pub use http::HttpChatClient;
pub use types::{
    ChunkStream, CompletionRequest, CompletionResponse, Message, ResponseFormat, Role, StreamChunk, TextStream,
    ToolCall, ToolDefinition, ToolHandler, ToolWorkflowResult,
};
