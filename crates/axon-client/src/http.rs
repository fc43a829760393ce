//! HTTP implementation of the chat capability
//!
//! Speaks the OpenAI-compatible protocol: `GET {base}/models` for health and
//! listing, `POST {base}/chat/completions` for completions, SSE for
//! streaming.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axon_config::ServerConfig;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::client::ChatClient;
use crate::error::{ClientError, Result};
use crate::types::{
    ChunkStream, CompletionRequest, CompletionResponse, Message, ModelList, StreamChunk, TextStream, ToolHandler,
    ToolWorkflowResult,
};
use crate::workflow;

/// Chat client backed by an OpenAI-compatible HTTP server
pub struct HttpChatClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
    current_model: Mutex<Option<String>>,
    connected: AtomicBool,
}

impl HttpChatClient {
    /// Build a client from endpoint configuration
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            current_model: Mutex::new(None),
            connected: AtomicBool::new(false),
        })
    }

    /// Build a client for the given base URL with default settings
    pub fn for_base_url(base_url: Url) -> Result<Self> {
        Self::new(&ServerConfig::for_base_url(base_url))
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }

    fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }
        builder
    }

    fn mark_connected(&self) {
        self.connected.store(true, Ordering::Relaxed);
    }

    async fn fetch_models(&self) -> Result<Vec<String>> {
        let response = self.request(Method::GET, self.endpoint("models")).send().await?;
        let response = check_status(response).await?;
        self.mark_connected();

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("model list: {e}")))?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }

    /// Model used for one-shot messages: the pinned one, else the first listed
    async fn resolve_model(&self) -> Result<String> {
        if let Some(model) = self.current_model() {
            return Ok(model);
        }

        self.fetch_models()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Config("no model available on the server".to_owned()))
    }

    fn one_shot_messages(text: &str, system_prompt: Option<&str>) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(text));
        messages
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn is_healthy(&self) -> Result<bool> {
        let response = self.request(Method::GET, self.endpoint("models")).send().await?;
        let healthy = response.status().is_success();
        if healthy {
            self.mark_connected();
        }
        Ok(healthy)
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        self.fetch_models().await
    }

    fn current_model(&self) -> Option<String> {
        self.current_model
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    async fn set_current_model(&self, model: &str) -> Result<bool> {
        let models = self.fetch_models().await?;
        if !models.iter().any(|m| m == model) {
            tracing::warn!(model, "requested model is not available on the server");
            return Ok(false);
        }

        *self
            .current_model
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(model.to_owned());
        tracing::info!(model, "pinned current model");
        Ok(true)
    }

    async fn send_message(&self, text: &str, system_prompt: Option<&str>) -> Result<String> {
        let model = self.resolve_model().await?;
        let request = CompletionRequest::new(model, Self::one_shot_messages(text, system_prompt));

        let response = self.send_completion(&request).await?;
        Ok(response.content().unwrap_or_default().to_owned())
    }

    async fn send_message_stream(&self, text: &str, system_prompt: Option<&str>) -> Result<TextStream> {
        let model = self.resolve_model().await?;
        let mut request = CompletionRequest::new(model, Self::one_shot_messages(text, system_prompt));
        request.stream = true;

        let chunks = self.send_completion_stream(&request).await?;
        let fragments = chunks.filter_map(|item| async move {
            match item {
                Ok(chunk) => chunk.content().map(|c| Ok(c.to_owned())),
                Err(e) => Some(Err(e)),
            }
        });
        Ok(Box::pin(fragments))
    }

    async fn send_completion(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let mut wire_request = request.clone();
        wire_request.stream = false;

        let response = self
            .request(Method::POST, self.endpoint("chat/completions"))
            .json(&wire_request)
            .send()
            .await?;
        let response = check_status(response).await?;
        self.mark_connected();

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("completion response: {e}")))
    }

    async fn send_completion_stream(&self, request: &CompletionRequest) -> Result<ChunkStream> {
        let mut wire_request = request.clone();
        wire_request.stream = true;

        let response = self
            .request(Method::POST, self.endpoint("chat/completions"))
            .json(&wire_request)
            .send()
            .await?;
        let response = check_status(response).await?;
        self.mark_connected();

        let events = response.bytes_stream().eventsource();
        let chunks = events.filter_map(|event| async move {
            match event {
                Ok(event) => {
                    let data = event.data.trim().to_owned();
                    if data == "[DONE]" {
                        return None;
                    }

                    match serde_json::from_str::<StreamChunk>(&data) {
                        Ok(chunk) => Some(Ok(chunk)),
                        Err(e) => {
                            tracing::debug!(error = %e, data = %data, "skipping unparseable SSE chunk");
                            None
                        }
                    }
                }
                Err(e) => Some(Err(ClientError::Stream(e.to_string()))),
            }
        });

        Ok(Box::pin(chunks))
    }

    async fn execute_tool_workflow(
        &self,
        request: CompletionRequest,
        handler: &dyn ToolHandler,
    ) -> Result<ToolWorkflowResult> {
        workflow::run_tool_workflow(self, request, handler).await
    }

    fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

/// Check an HTTP response for errors, extracting the server's message
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: parse_error_body(&body),
    })
}

/// Extract the error message from an OpenAI-style error body
fn parse_error_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(ToOwned::to_owned))
        .unwrap_or_else(|| body.to_owned())
}
