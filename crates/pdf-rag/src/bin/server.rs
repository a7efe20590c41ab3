//! Question answering server binary
//!
//! Run with: cargo run -p pdf-rag --bin pdf-rag-server

use anyhow::Context;
use clap::Parser;

use pdf_rag::{cli::ConfigArgs, logging, server::RagServer};

#[derive(Parser)]
#[command(name = "pdf-rag-server", version, about = "Serve the PDF question page and query API")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Address to bind (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init("pdf_rag=info,tower_http=debug");

    let mut config = cli.config.load().context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Index path: {}", config.paths.db_path.display());
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Top K: {}", config.retrieval.top_k);

    let server = RagServer::new(config).context("Failed to initialise server")?;

    println!("\nServer starting...");
    println!("  Page: http://{}/", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  GET  /?q=...     - Ask from the browser");
    println!("  POST /api/query  - Ask with JSON {{\"question\": \"...\"}}");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
