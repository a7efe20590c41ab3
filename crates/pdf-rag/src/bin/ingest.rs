//! Ingestion binary: rebuild the vector index from the data directory
//!
//! Run with: cargo run -p pdf-rag --bin pdf-rag-ingest -- --data-path data

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

use pdf_rag::{cli::ConfigArgs, logging, providers::OllamaEmbedder, IngestOutcome, IngestPipeline};

#[derive(Parser)]
#[command(name = "pdf-rag-ingest", version, about = "Rebuild the PDF vector index")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Hide the embedding progress bar
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init("pdf_rag=info");

    let config = cli.config.load().context("Failed to load configuration")?;
    tracing::info!("  - Data path: {}", config.paths.data_path.display());
    tracing::info!("  - Index path: {}", config.paths.db_path.display());
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!(
        "  - Chunk size: {} (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    let embedder = OllamaEmbedder::new(&config.llm).context("Failed to create Ollama client")?;

    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} Embedding [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .context("Invalid progress template")?
                .progress_chars("#>-"),
        );
        bar
    };

    let report = IngestPipeline::new(config, Arc::new(embedder))
        .with_progress(progress)
        .run()
        .await
        .context("Ingestion failed")?;

    match report.outcome {
        IngestOutcome::Indexed { chunks } => {
            println!("Added {} chunks from {} page(s)", chunks, report.documents)
        }
        IngestOutcome::NothingToAdd => println!("{}", report.outcome),
    }
    println!("Process completed in {}s", report.elapsed.as_secs_f64());

    Ok(())
}
