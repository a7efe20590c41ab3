//! pdf-rag: question answering over a directory of PDFs
//!
//! `pdf-rag-ingest` splits every page of every PDF into overlapping chunks,
//! embeds them with Ollama and stores them in a local SQLite vector index.
//! `pdf-rag-server` and `pdf-rag-ask` answer questions from the five most
//! similar chunks and cite the source file and page of each.

pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod logging;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::{ChainOutput, RetrievalChain};
pub use ingestion::{IngestOutcome, IngestPipeline, IngestReport};
pub use retrieval::{RetrievedChunk, VectorIndex};
pub use types::{format_source, get_unique_sources, Chunk, Document, QueryRequest, QueryResponse};
