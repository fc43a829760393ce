//! Mock OpenAI-compatible inference server for client tests
//!
//! Serves canned completions, word-by-word SSE streams, and a one-round
//! tool-call exchange.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Mock inference server that returns predictable responses
pub struct MockServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    completion_count: AtomicU32,
    /// Number of completion requests to fail with 500 before succeeding
    fail_count: AtomicU32,
    response_content: Option<String>,
    models: Vec<String>,
}

impl MockServer {
    /// Start with one model and the default reply
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(0, None, vec!["mock-model-1".to_owned()]).await
    }

    /// Start a server that fails the first `n` completion requests with 500
    pub async fn start_failing(n: u32) -> anyhow::Result<Self> {
        Self::start_inner(n, None, vec!["mock-model-1".to_owned()]).await
    }

    /// Start with a custom reply content
    pub async fn start_with_response(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(0, Some(content.to_owned()), vec!["mock-model-1".to_owned()]).await
    }

    /// Start with an explicit model list
    pub async fn start_with_models(models: &[&str]) -> anyhow::Result<Self> {
        Self::start_inner(0, None, models.iter().map(|&m| m.to_owned()).collect()).await
    }

    async fn start_inner(fail_count: u32, response_content: Option<String>, models: Vec<String>) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            completion_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(fail_count),
            response_content,
            models,
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .route("/v1/models", routing::get(handle_models))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the client
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of completion requests received
    pub fn completion_count(&self) -> u32 {
        self.state.completion_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Wire types matching the OpenAI format --

#[derive(Debug, Deserialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(default)]
    stream: Option<bool>,
    #[serde(default)]
    tools: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    role: String,
    #[allow(dead_code)]
    content: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionResponse {
    id: String,
    object: String,
    model: String,
    choices: Vec<Choice>,
}

#[derive(Debug, Serialize)]
struct Choice {
    index: u32,
    message: ResponseMessage,
    finish_reason: String,
}

#[derive(Debug, Serialize)]
struct ResponseMessage {
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCallResponse>>,
}

#[derive(Debug, Serialize)]
struct ToolCallResponse {
    id: String,
    #[serde(rename = "type")]
    tool_type: String,
    function: FunctionCallResponse,
}

#[derive(Debug, Serialize)]
struct FunctionCallResponse {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize)]
struct ModelListResponse {
    object: String,
    data: Vec<ModelObject>,
}

#[derive(Debug, Serialize)]
struct ModelObject {
    id: String,
    object: String,
    owned_by: String,
}

#[derive(Debug, Serialize)]
struct StreamChunk {
    id: String,
    object: String,
    model: String,
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Serialize)]
struct StreamChoice {
    index: u32,
    delta: StreamDelta,
    #[serde(skip_serializing_if = "Option::is_none")]
    finish_reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct StreamDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

// -- Handlers --

async fn handle_chat_completions(
    State(state): State<Arc<MockState>>,
    Json(req): Json<ChatCompletionRequest>,
) -> impl IntoResponse {
    state.completion_count.fetch_add(1, Ordering::Relaxed);

    let remaining = state.fail_count.load(Ordering::Relaxed);
    if remaining > 0 {
        state.fail_count.fetch_sub(1, Ordering::Relaxed);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": {
                    "message": "mock server intentional failure",
                    "type": "server_error"
                }
            })),
        )
            .into_response();
    }

    if req.stream.unwrap_or(false) {
        return build_streaming_response(&state, &req).into_response();
    }

    let content = state.response_content.as_deref().unwrap_or("Hello from mock");

    // First round of a tool exchange: request a call; once a tool result is
    // present in the transcript, produce the final answer
    let has_tool_result = req.messages.iter().any(|m| m.role == "tool");
    let (content, tool_calls, finish_reason) = if req.tools.is_some() && !has_tool_result {
        (
            String::new(),
            Some(vec![ToolCallResponse {
                id: "call_mock_1".to_owned(),
                tool_type: "function".to_owned(),
                function: FunctionCallResponse {
                    name: "get_weather".to_owned(),
                    arguments: r#"{"location":"Oslo"}"#.to_owned(),
                },
            }]),
            "tool_calls".to_owned(),
        )
    } else {
        (content.to_owned(), None, "stop".to_owned())
    };

    let response = ChatCompletionResponse {
        id: "chatcmpl-mock-1".to_owned(),
        object: "chat.completion".to_owned(),
        model: req.model,
        choices: vec![Choice {
            index: 0,
            message: ResponseMessage {
                role: "assistant".to_owned(),
                content,
                tool_calls,
            },
            finish_reason,
        }],
    };

    Json(response).into_response()
}

/// Build an SSE body: a role chunk, one content chunk per word, a finish
/// chunk, and the `[DONE]` marker
fn build_streaming_response(state: &MockState, req: &ChatCompletionRequest) -> impl IntoResponse {
    let content = state
        .response_content
        .as_deref()
        .unwrap_or("Hello from mock")
        .to_owned();

    let id = "chatcmpl-mock-stream";
    let mut body = String::new();

    let mut push_chunk = |delta: StreamDelta, finish_reason: Option<String>| {
        let chunk = StreamChunk {
            id: id.to_owned(),
            object: "chat.completion.chunk".to_owned(),
            model: req.model.clone(),
            choices: vec![StreamChoice {
                index: 0,
                delta,
                finish_reason,
            }],
        };
        body.push_str(&format!("data: {}\n\n", serde_json::to_string(&chunk).unwrap()));
    };

    push_chunk(
        StreamDelta {
            role: Some("assistant".to_owned()),
            content: None,
        },
        None,
    );

    for word in content.split_whitespace() {
        push_chunk(
            StreamDelta {
                role: None,
                content: Some(format!("{word} ")),
            },
            None,
        );
    }

    push_chunk(StreamDelta { role: None, content: None }, Some("stop".to_owned()));

    body.push_str("data: [DONE]\n\n");

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/event-stream")],
        body,
    )
}

async fn handle_models(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    let response = ModelListResponse {
        object: "list".to_owned(),
        data: state
            .models
            .iter()
            .map(|id| ModelObject {
                id: id.clone(),
                object: "model".to_owned(),
                owned_by: "mock".to_owned(),
            })
            .collect(),
    };

    Json(response)
}
