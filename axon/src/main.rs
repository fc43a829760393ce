#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::sync::Arc;

use args::Args;
use axon_client::{ChatClient, HttpChatClient};
use axon_config::Config;
use axon_core::{ChatService, Monitor};
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        config_path = %args.config.display(),
        server = %config.server.base_url,
        "starting axon"
    );

    let client: Arc<dyn ChatClient> = Arc::new(HttpChatClient::new(&config.server)?);
    let service = ChatService::new(client);

    if let Some(model) = &config.chat.default_model
        && !service.switch_model(model).await
    {
        tracing::warn!(model, "could not pin the configured default model");
    }

    // One-shot mode: send the message and print whatever comes back
    if let Some(message) = &args.message {
        let system_prompt = args.system.as_deref().or(config.chat.system_prompt.as_deref());
        match service.chat(message, system_prompt).await {
            Ok(reply) => println!("{reply}"),
            Err(failure) => {
                eprintln!("{failure}");
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Monitor mode: watch the server until interrupted
    let monitor = Monitor::with_config(service, config.monitor);

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    monitor.run(shutdown).await;

    tracing::info!("axon stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
