#![allow(clippy::must_use_candidate)]

//! Typed configuration for the Axon chat orchestration layer

pub mod chat;
mod loader;
pub mod monitor;
pub mod server;

use serde::Deserialize;

pub use chat::ChatConfig;
pub use monitor::MonitorConfig;
pub use server::ServerConfig;

/// Top-level Axon configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Inference server endpoint configuration
    pub server: ServerConfig,
    /// Chat defaults
    #[serde(default)]
    pub chat: ChatConfig,
    /// Background monitor schedule
    #[serde(default)]
    pub monitor: MonitorConfig,
}
