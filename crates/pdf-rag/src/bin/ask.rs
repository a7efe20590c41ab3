//! One-shot question from the terminal
//!
//! Run with: cargo run -p pdf-rag --bin pdf-rag-ask -- "Who is Wraith?"

use anyhow::Context;
use clap::Parser;
use console::style;
use std::sync::Arc;

use pdf_rag::{cli::ConfigArgs, logging, providers::OllamaProvider, RetrievalChain};

#[derive(Parser)]
#[command(name = "pdf-rag-ask", version, about = "Ask a question about the ingested PDFs")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// The question to answer
    #[arg(required = true)]
    question: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init("pdf_rag=warn");

    let question = cli.question.join(" ");
    let question = question.trim();
    anyhow::ensure!(!question.is_empty(), "Question must not be empty");

    let config = cli.config.load().context("Failed to load configuration")?;
    let (embedder, llm) = OllamaProvider::new(&config.llm)
        .context("Failed to create Ollama client")?
        .split();

    let chain = RetrievalChain::from_config(&config, Arc::new(embedder), Arc::new(llm));
    let response = chain.ask(question).await.context("Query failed")?;

    println!(
        "{} {}s",
        style("Response Time :").bold(),
        response.response_time_secs
    );
    println!("{} {}", style("Answer :").bold(), response.answer);
    println!("{}", style("Source(s)").bold().underlined());
    for source in &response.sources {
        println!("  {}", style(source).dim());
    }

    Ok(())
}
