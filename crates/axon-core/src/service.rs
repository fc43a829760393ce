//! The `ChatService` facade
//!
//! Composes readiness gating, conversation state, and stream adaptation
//! over the chat capability. Operations are independently schedulable and
//! safe to call concurrently; the only cross-call state is the
//! [`Conversation`] the caller supplies, which this service borrows for the
//! duration of a single turn.

use std::sync::Arc;

use axon_client::{
    ChatClient, CompletionRequest, Message, ResponseFormat, ToolDefinition, ToolHandler, ToolWorkflowResult,
};
use futures_util::{Stream, StreamExt, stream};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::conversation::Conversation;
use crate::error::ChatFailure;
use crate::readiness::Readiness;
use crate::stream::{ReplyStream, adapt_fragments, one_shot, open_turn_stream};

/// Read-only snapshot of server state, rebuilt on every query
#[derive(Debug, Clone)]
pub struct ServerStatus {
    /// Whether the server answered the health check
    pub healthy: bool,
    /// Models available on the server (empty when unhealthy)
    pub models: Vec<String>,
    /// Model pinned on the client, if any
    pub current_model: Option<String>,
    /// Base URL of the backing server
    pub base_url: String,
    /// Whether any call has succeeded against the server yet
    pub connected: bool,
    /// Error text when the snapshot could not be taken
    pub error: Option<String>,
}

/// Facade over the chat capability
///
/// Cheap to clone; shares the capability client across all clones.
#[derive(Clone)]
pub struct ChatService {
    client: Arc<dyn ChatClient>,
}

impl ChatService {
    /// Service over the given capability client
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }

    /// The underlying chat capability
    pub fn client(&self) -> &Arc<dyn ChatClient> {
        &self.client
    }

    /// Evaluate server readiness; never gated, never fails
    pub async fn check_readiness(&self) -> Readiness {
        Readiness::evaluate(self.client.as_ref()).await
    }

    /// Model pinned on the client, if any
    pub fn current_model(&self) -> Option<String> {
        self.client.current_model()
    }

    /// Start a conversation, optionally seeded with a system prompt
    pub fn new_conversation(&self, system_prompt: Option<&str>) -> Conversation {
        system_prompt.map_or_else(Conversation::new, |prompt| Conversation::with_system_prompt(prompt))
    }

    /// One-shot chat, gated on readiness
    ///
    /// A not-ready verdict and any capability failure both come back as a
    /// typed [`ChatFailure`], never as a panic or an unclassified error.
    pub async fn chat(&self, message: &str, system_prompt: Option<&str>) -> Result<String, ChatFailure> {
        let verdict = self.check_readiness().await;
        if !verdict.ready {
            return Err(ChatFailure::not_ready(&verdict));
        }

        self.client
            .send_message(message, system_prompt)
            .await
            .map_err(|e| {
                let failure = ChatFailure::from_client(&e);
                tracing::warn!(error = %e, kind = ?failure.kind, "chat failed");
                failure
            })
    }

    /// One-shot streaming chat
    ///
    /// Always yields a stream so every caller iterates uniformly: a
    /// not-ready verdict becomes a single fragment carrying the status text,
    /// and an open failure becomes the synthetic error reply.
    pub async fn chat_stream(&self, message: &str, system_prompt: Option<&str>) -> ReplyStream {
        let verdict = self.check_readiness().await;
        if !verdict.ready {
            return one_shot(verdict.status);
        }

        adapt_fragments(self.client.send_message_stream(message, system_prompt).await)
    }

    /// Execute one conversation turn, appending to the caller's state
    ///
    /// The looser string contract is intentional and kept for compatibility:
    /// a not-ready verdict comes back as the returned text, and a capability
    /// failure comes back as the failure kind's fixed message. The user
    /// message stays recorded in that case, but no assistant message is
    /// appended for a failed turn. Only the no-model-available precondition
    /// is an `Err`.
    pub async fn continue_conversation(
        &self,
        conversation: &mut Conversation,
        text: &str,
    ) -> Result<String, ChatFailure> {
        let verdict = self.check_readiness().await;
        if !verdict.ready {
            return Ok(verdict.status);
        }

        conversation.push_user(text);
        let model = self.resolve_model().await?;

        let request = conversation.to_request(model, false);
        match self.client.send_completion(&request).await {
            Ok(response) => {
                let reply = response.content().unwrap_or_default().to_owned();
                conversation.push_assistant(reply.clone());
                Ok(reply)
            }
            Err(e) => {
                let failure = ChatFailure::from_client(&e);
                tracing::warn!(error = %e, kind = ?failure.kind, "conversation turn failed");
                Ok(failure.message)
            }
        }
    }

    /// Streaming conversation turn
    ///
    /// Appends the user message before issuing the request, yields non-empty
    /// fragments as they arrive, and appends the accumulated reply as a
    /// single assistant message only once the stream fully drains. A
    /// mid-stream failure terminates the stream and discards the partial
    /// reply, leaving the stored history with the user message only.
    pub fn continue_conversation_stream<'a>(
        &'a self,
        conversation: &'a mut Conversation,
        text: &str,
    ) -> impl Stream<Item = Result<String, ChatFailure>> + Send + use<'a> {
        let start = TurnStream::Gate {
            service: self,
            conversation,
            text: text.to_owned(),
        };
        stream::unfold(start, |state| drive_turn(state))
    }

    /// Generate a value constrained to `T`'s JSON schema
    ///
    /// Silent by contract: returns `None` when the server is not ready, no
    /// model is available, the reply is empty, or the reply does not parse
    /// as `T`. Diagnostics go to the debug log only.
    pub async fn generate_structured<T>(&self, prompt: &str, system_prompt: Option<&str>) -> Option<T>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let verdict = self.check_readiness().await;
        if !verdict.ready {
            tracing::debug!(status = %verdict.status, "structured generation skipped: not ready");
            return None;
        }

        let model = self.resolve_model().await.ok()?;

        let schema = serde_json::to_value(schemars::schema_for!(T)).ok()?;
        let mut request = CompletionRequest::new(model, one_shot_messages(prompt, system_prompt));
        request.response_format = Some(ResponseFormat::json_schema(T::schema_name(), schema));

        let response = match self.client.send_completion(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "structured generation failed");
                return None;
            }
        };

        let content = response.content()?;
        if content.is_empty() {
            return None;
        }

        match serde_json::from_str(content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(error = %e, "structured reply did not match the schema");
                None
            }
        }
    }

    /// Run a tool workflow through the capability's executor
    ///
    /// This service only wires the workflow up and classifies failures; the
    /// multi-round loop itself belongs to the capability.
    pub async fn execute_with_tools(
        &self,
        message: &str,
        tools: Vec<ToolDefinition>,
        handler: &dyn ToolHandler,
        system_prompt: Option<&str>,
    ) -> ToolWorkflowResult {
        let verdict = self.check_readiness().await;
        if !verdict.ready {
            return ToolWorkflowResult::failure(verdict.message);
        }

        let model = match self.resolve_model().await {
            Ok(model) => model,
            Err(failure) => return ToolWorkflowResult::failure(failure.message),
        };

        let mut request = CompletionRequest::new(model, one_shot_messages(message, system_prompt));
        request.tools = Some(tools);

        match self.client.execute_tool_workflow(request, handler).await {
            Ok(result) => result,
            Err(e) => {
                let failure = ChatFailure::from_client(&e);
                tracing::warn!(error = %e, kind = ?failure.kind, "tool workflow failed");
                ToolWorkflowResult::failure(failure.message)
            }
        }
    }

    /// Pin a model; failures are reported as `false`, never raised
    pub async fn switch_model(&self, model: &str) -> bool {
        match self.client.set_current_model(model).await {
            Ok(switched) => switched,
            Err(e) => {
                tracing::warn!(model, error = %e, "model switch failed");
                false
            }
        }
    }

    /// Models available on the server; empty on any failure
    pub async fn list_models(&self) -> Vec<String> {
        match self.client.list_models().await {
            Ok(models) => models,
            Err(e) => {
                tracing::warn!(error = %e, "model listing failed");
                Vec::new()
            }
        }
    }

    /// Snapshot of server state
    ///
    /// Never fails: an error while composing the snapshot yields an
    /// unhealthy snapshot carrying the error text.
    pub async fn server_status(&self) -> ServerStatus {
        match self.try_server_status().await {
            Ok(status) => status,
            Err(e) => ServerStatus {
                healthy: false,
                models: Vec::new(),
                current_model: self.client.current_model(),
                base_url: self.client.base_url().to_owned(),
                connected: self.client.is_connected(),
                error: Some(e.to_string()),
            },
        }
    }

    async fn try_server_status(&self) -> axon_client::Result<ServerStatus> {
        let healthy = self.client.is_healthy().await?;
        let models = if healthy { self.client.list_models().await? } else { Vec::new() };

        Ok(ServerStatus {
            healthy,
            models,
            current_model: self.client.current_model(),
            base_url: self.client.base_url().to_owned(),
            connected: self.client.is_connected(),
            error: None,
        })
    }

    /// Target model for a turn: the pinned model, else the first available
    ///
    /// A listing failure during resolution collapses into the same
    /// no-model-available condition as an empty list.
    async fn resolve_model(&self) -> Result<String, ChatFailure> {
        if let Some(model) = self.client.current_model() {
            return Ok(model);
        }

        let models = match self.client.list_models().await {
            Ok(models) => models,
            Err(e) => {
                tracing::debug!(error = %e, "model listing failed during resolution");
                Vec::new()
            }
        };

        models.into_iter().next().ok_or_else(ChatFailure::no_model_available)
    }
}

fn one_shot_messages(text: &str, system_prompt: Option<&str>) -> Vec<Message> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt {
        messages.push(Message::system(system));
    }
    messages.push(Message::user(text));
    messages
}

/// State machine backing [`ChatService::continue_conversation_stream`]
enum TurnStream<'a> {
    /// Readiness gate not yet evaluated
    Gate {
        service: &'a ChatService,
        conversation: &'a mut Conversation,
        text: String,
    },
    /// Underlying stream open; accumulating fragments
    Streaming {
        inner: ReplyStream,
        buffer: String,
        conversation: &'a mut Conversation,
    },
    /// Terminal: nothing further is yielded
    Done,
}

async fn drive_turn<'a>(state: TurnStream<'a>) -> Option<(Result<String, ChatFailure>, TurnStream<'a>)> {
    let mut state = state;
    loop {
        match state {
            TurnStream::Gate {
                service,
                conversation,
                text,
            } => {
                let verdict = service.check_readiness().await;
                if !verdict.ready {
                    return Some((Ok(verdict.status), TurnStream::Done));
                }

                conversation.push_user(text);
                let model = match service.resolve_model().await {
                    Ok(model) => model,
                    Err(failure) => return Some((Err(failure), TurnStream::Done)),
                };

                let request = conversation.to_request(model, true);
                let inner = open_turn_stream(service.client.as_ref(), request).await;
                state = TurnStream::Streaming {
                    inner,
                    buffer: String::new(),
                    conversation,
                };
            }
            TurnStream::Streaming {
                mut inner,
                mut buffer,
                conversation,
            } => loop {
                match inner.next().await {
                    Some(Ok(fragment)) => {
                        if fragment.is_empty() {
                            continue;
                        }
                        buffer.push_str(&fragment);
                        return Some((
                            Ok(fragment),
                            TurnStream::Streaming {
                                inner,
                                buffer,
                                conversation,
                            },
                        ));
                    }
                    Some(Err(failure)) => return Some((Err(failure), TurnStream::Done)),
                    None => {
                        if !buffer.is_empty() {
                            conversation.push_assistant(buffer);
                        }
                        return None;
                    }
                }
            },
            TurnStream::Done => return None,
        }
    }
}
