#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Orchestration core for Axon
//!
//! Sits in front of a [`ChatClient`](axon_client::ChatClient) capability and
//! provides:
//! - readiness gating that classifies server state before any request,
//! - append-only conversation state turned into completion requests,
//! - a streaming pipeline that masks open failures with a synthetic
//!   one-fragment reply,
//! - the [`ChatService`] facade composing the above,
//! - a supervised [`Monitor`] loop with adaptive backoff.
//!
//! Failures from the capability never escape the public surface as raised
//! errors: each operation converts them into a typed failure, a synthetic
//! stream item, a boolean, or an empty result, per its documented contract.

pub mod conversation;
pub mod error;
pub mod monitor;
pub mod readiness;
pub mod service;
pub mod stream;

pub use conversation::Conversation;
pub use error::{ChatFailure, ErrorKind};
pub use monitor::{IterationHook, Monitor, MonitorState, StatusLogHook};
pub use readiness::Readiness;
pub use service::{ChatService, ServerStatus};
pub use stream::ReplyStream;
