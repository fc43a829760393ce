use std::path::PathBuf;

use clap::Parser;

/// Axon chat orchestrator
#[derive(Debug, Parser)]
#[command(name = "axon", about = "Client-side orchestration for an OpenAI-compatible inference server")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "axon.toml", env = "AXON_CONFIG")]
    pub config: PathBuf,

    /// Send a single message and print the reply instead of monitoring
    #[arg(short, long)]
    pub message: Option<String>,

    /// System prompt override for one-shot messages
    #[arg(long)]
    pub system: Option<String>,
}
