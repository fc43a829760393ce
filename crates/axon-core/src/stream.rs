//! Stream adaptation: eager open with synthetic substitution on failure
//!
//! "Open" is a distinct step from "pull": a failure to open the underlying
//! stream is masked as a one-shot synthetic reply carrying the classified
//! kind's fixed message, while a failure during iteration propagates to the
//! caller at the failing pull. Callers cannot distinguish a genuine
//! one-fragment reply from a synthetic error fragment; that asymmetry is a
//! documented contract of this layer, not an accident.

use std::pin::Pin;

use axon_client::{ChatClient, ClientError, CompletionRequest, TextStream};
use futures_util::{Stream, StreamExt, stream};

use crate::error::{ChatFailure, ErrorKind};

/// Lazy, finite, non-restartable sequence of reply fragments
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<String, ChatFailure>> + Send>>;

/// One-element stream carrying the given text
pub(crate) fn one_shot(text: String) -> ReplyStream {
    Box::pin(stream::once(async move { Ok(text) }))
}

/// Adapt an already-opened text stream, masking an open failure
pub(crate) fn adapt_fragments(opened: Result<TextStream, ClientError>) -> ReplyStream {
    match opened {
        Ok(fragments) => Box::pin(fragments.map(|item| item.map_err(|e| ChatFailure::from_client(&e)))),
        Err(e) => synthetic_reply(&e),
    }
}

/// Open a streaming completion eagerly and reduce it to content fragments
///
/// Chunks without delta content are dropped; pull-time failures become `Err`
/// items.
pub(crate) async fn open_turn_stream(client: &dyn ChatClient, request: CompletionRequest) -> ReplyStream {
    match client.send_completion_stream(&request).await {
        Ok(chunks) => Box::pin(chunks.filter_map(|item| async move {
            match item {
                Ok(chunk) => chunk.content().map(|c| Ok(c.to_owned())),
                Err(e) => Some(Err(ChatFailure::from_client(&e))),
            }
        })),
        Err(e) => synthetic_reply(&e),
    }
}

/// The synthetic one-fragment stream substituted for a failed open
fn synthetic_reply(error: &ClientError) -> ReplyStream {
    let kind = ErrorKind::classify(error);
    tracing::warn!(error = %error, kind = ?kind, "failed to open stream; substituting synthetic reply");
    one_shot(kind.user_message().to_owned())
}
