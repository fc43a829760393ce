//! Scripted in-process chat client for orchestration tests

// Not every test binary exercises every scripted behavior
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use axon_client::{
    ChatClient, ChunkStream, ClientError, CompletionRequest, CompletionResponse, Result, StreamChunk, TextStream,
    ToolHandler, ToolWorkflowResult,
};
use futures_util::stream;
use tokio::sync::Notify;

/// Scripted stream fragment: `Ok(Some(text))` is a content chunk, `Ok(None)`
/// a contentless chunk, `Err(..)` a pull failure
pub type ScriptedFragment = Result<Option<String>>;

/// Script for one `send_*_stream` call
pub enum StreamScript {
    /// Fail before the first item is available
    FailOpen(ClientError),
    /// Open successfully and replay these fragments
    Fragments(Vec<ScriptedFragment>),
}

/// Chat client whose behavior is driven entirely by the test
#[derive(Default)]
pub struct FakeChatClient {
    healthy: AtomicBool,
    fail_health: AtomicBool,
    models: Mutex<Vec<String>>,
    current: Mutex<Option<String>>,
    completions: Mutex<VecDeque<Result<CompletionResponse>>>,
    streams: Mutex<VecDeque<StreamScript>>,
    /// Every completion request the client saw, in order
    pub requests: Mutex<Vec<CompletionRequest>>,
    health_checks: AtomicU32,
    probe: Notify,
}

impl FakeChatClient {
    /// Healthy server with the given models loaded
    pub fn ready(models: &[&str]) -> Self {
        let fake = Self::default();
        fake.set_healthy(true);
        fake.set_models(models);
        fake
    }

    /// Unreachable server
    pub fn offline() -> Self {
        Self::default()
    }

    /// Healthy server with no models loaded
    pub fn healthy_no_models() -> Self {
        let fake = Self::default();
        fake.set_healthy(true);
        fake
    }

    pub fn set_healthy(&self, value: bool) {
        self.healthy.store(value, Ordering::SeqCst);
    }

    /// Make `is_healthy` fail with a 503 instead of answering
    pub fn fail_health_checks(&self) {
        self.fail_health.store(true, Ordering::SeqCst);
    }

    pub fn set_models(&self, models: &[&str]) {
        *self.models.lock().unwrap() = models.iter().map(|&m| m.to_owned()).collect();
    }

    pub fn pin_model(&self, model: &str) {
        *self.current.lock().unwrap() = Some(model.to_owned());
    }

    /// Queue a plain-text completion reply
    pub fn push_reply(&self, text: &str) {
        self.completions
            .lock()
            .unwrap()
            .push_back(Ok(CompletionResponse::from_text("fake", text)));
    }

    /// Queue a full completion response
    pub fn push_completion(&self, response: CompletionResponse) {
        self.completions.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a completion failure
    pub fn push_completion_error(&self, error: ClientError) {
        self.completions.lock().unwrap().push_back(Err(error));
    }

    /// Queue a stream script
    pub fn push_stream(&self, script: StreamScript) {
        self.streams.lock().unwrap().push_back(script);
    }

    pub fn health_check_count(&self) -> u32 {
        self.health_checks.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` health checks have been observed
    pub async fn wait_for_health_checks(&self, count: u32) {
        loop {
            let notified = self.probe.notified();
            if self.health_check_count() >= count {
                return;
            }
            notified.await;
        }
    }

    fn next_completion(&self) -> Result<CompletionResponse> {
        self.completions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CompletionResponse::from_text("fake", "ok")))
    }

    fn next_stream(&self) -> StreamScript {
        self.streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| StreamScript::Fragments(vec![Ok(Some("ok".to_owned()))]))
    }
}

#[async_trait]
impl ChatClient for FakeChatClient {
    async fn is_healthy(&self) -> Result<bool> {
        self.health_checks.fetch_add(1, Ordering::SeqCst);
        self.probe.notify_waiters();

        if self.fail_health.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 503,
                message: "service unavailable".to_owned(),
            });
        }
        Ok(self.healthy.load(Ordering::SeqCst))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(self.models.lock().unwrap().clone())
    }

    fn current_model(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }

    async fn set_current_model(&self, model: &str) -> Result<bool> {
        if self.models.lock().unwrap().iter().any(|m| m == model) {
            *self.current.lock().unwrap() = Some(model.to_owned());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn send_message(&self, _text: &str, _system_prompt: Option<&str>) -> Result<String> {
        let response = self.next_completion()?;
        Ok(response.content().unwrap_or_default().to_owned())
    }

    async fn send_message_stream(&self, _text: &str, _system_prompt: Option<&str>) -> Result<TextStream> {
        match self.next_stream() {
            StreamScript::FailOpen(error) => Err(error),
            StreamScript::Fragments(fragments) => {
                let items: Vec<Result<String>> = fragments
                    .into_iter()
                    .filter_map(|fragment| match fragment {
                        Ok(Some(text)) => Some(Ok(text)),
                        Ok(None) => None,
                        Err(error) => Some(Err(error)),
                    })
                    .collect();
                Ok(Box::pin(stream::iter(items)))
            }
        }
    }

    async fn send_completion(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.next_completion()
    }

    async fn send_completion_stream(&self, request: &CompletionRequest) -> Result<ChunkStream> {
        self.requests.lock().unwrap().push(request.clone());

        match self.next_stream() {
            StreamScript::FailOpen(error) => Err(error),
            StreamScript::Fragments(fragments) => {
                let items: Vec<Result<StreamChunk>> = fragments
                    .into_iter()
                    .map(|fragment| {
                        fragment.map(|content| {
                            content.map_or(StreamChunk { choices: vec![] }, StreamChunk::of_content)
                        })
                    })
                    .collect();
                Ok(Box::pin(stream::iter(items)))
            }
        }
    }

    async fn execute_tool_workflow(
        &self,
        request: CompletionRequest,
        handler: &dyn ToolHandler,
    ) -> Result<ToolWorkflowResult> {
        axon_client::workflow::run_tool_workflow(self, request, handler).await
    }

    fn base_url(&self) -> &str {
        "http://fake.local/v1"
    }

    fn is_connected(&self) -> bool {
        true
    }
}
