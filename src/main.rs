use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use querycraft::api::{AppState, create_router};
use querycraft::config::Config;
use querycraft::extractor::IntentExtractor;
use querycraft::llm::OpenAiChat;
use querycraft::search::SearchPipeline;

#[derive(Parser)]
#[command(name = "querycraft", about = "Turn free-text requests into search engine URLs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API.
    Serve {
        /// Overrides PORT.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Build a search URL for one request and print it.
    Query {
        #[arg(required = true)]
        text: Vec<String>,
    },
}

fn build_pipeline(config: &Config) -> Result<SearchPipeline> {
    let model = OpenAiChat::new(config).context("Failed to create OpenAI client")?;
    let extractor = IntentExtractor::new(Arc::new(model), config.temperature);
    Ok(SearchPipeline::new(extractor))
}

async fn serve(config: Config, port: u16) -> Result<()> {
    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState::new(build_pipeline(&config)?, shutdown.clone()));
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Starting server on http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutdown requested, cancelling in-flight requests");
            shutdown.cancel();
        })
        .await
        .context("Server error")?;
    Ok(())
}

async fn query(config: Config, text: String) -> Result<()> {
    let pipeline = build_pipeline(&config)?;
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let outcome = pipeline.handle(&text, &cancel).await?;
    println!("{}", outcome.search_url);
    println!("{}", serde_json::to_string_pretty(&outcome.intent)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.port);
            serve(config, port).await
        }
        Command::Query { text } => {
            let text = text.join(" ");
            if text.trim().is_empty() {
                anyhow::bail!("Query text cannot be empty");
            }
            query(config, text).await
        }
    }
}
