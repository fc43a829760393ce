//! Append-only conversation state

use axon_client::{CompletionRequest, Message};

/// Ordered message history plus an optional system prompt
///
/// The system prompt is fixed at construction and always serialized first;
/// history only grows. No internal synchronization: callers must not run two
/// turn operations over the same conversation concurrently.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    system_prompt: Option<String>,
    history: Vec<Message>,
}

impl Conversation {
    /// Empty conversation with no system prompt
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty conversation seeded with a system prompt
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: Some(prompt.into()),
            history: Vec::new(),
        }
    }

    /// The system prompt, if one was set at construction
    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// Append a user message
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.history.push(Message::user(text));
    }

    /// Append an assistant message
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.history.push(Message::assistant(text));
    }

    /// Number of history messages (the system prompt is not counted)
    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    /// The history in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.history
    }

    /// Assemble a completion request: system prompt first, then the full
    /// history in insertion order
    pub fn to_request(&self, model: impl Into<String>, stream: bool) -> CompletionRequest {
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        if let Some(system) = &self.system_prompt {
            messages.push(Message::system(system.clone()));
        }
        messages.extend(self.history.iter().cloned());

        let mut request = CompletionRequest::new(model, messages);
        request.stream = stream;
        request
    }
}
