//! Batch ingestion: load PDFs, split, embed, and rebuild the vector index

use indicatif::ProgressBar;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::retrieval::VectorIndex;
use crate::types::Chunk;

use super::{DocumentLoader, RecursiveTextSplitter};

/// What an ingestion run wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A fresh index holding this many chunks
    Indexed { chunks: usize },
    /// The data directory produced no chunks; no index was written
    NothingToAdd,
}

impl fmt::Display for IngestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed { chunks } => write!(f, "Indexed {} chunks", chunks),
            Self::NothingToAdd => write!(f, "No documents to add."),
        }
    }
}

/// Summary of one ingestion run
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub outcome: IngestOutcome,
    /// Pages loaded from the data directory
    pub documents: usize,
    /// Whether an existing index directory was removed first
    pub cleared_previous: bool,
    pub elapsed: Duration,
}

/// Full, destructive rebuild of the index from the data directory
pub struct IngestPipeline {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    progress: ProgressBar,
}

impl IngestPipeline {
    pub fn new(config: RagConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            config,
            embedder,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report embedding progress on `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Run the pipeline.
    ///
    /// The previous index is removed before anything is loaded. The new index
    /// is written only once every chunk has been embedded, so a failure leaves
    /// no index rather than a partial one.
    pub async fn run(&self) -> Result<IngestReport> {
        let start = Instant::now();
        let splitter = RecursiveTextSplitter::from_config(&self.config.chunking)?;

        let cleared_previous = clear_database(self.config.paths.db_path.clone()).await?;

        let loader = DocumentLoader::from_config(&self.config.paths);
        let documents = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|e| Error::internal(format!("Loader task failed: {}", e)))??;

        let chunks = splitter.split_documents(&documents);
        tracing::info!(
            "Split {} page(s) into {} chunk(s)",
            documents.len(),
            chunks.len()
        );

        let outcome = if chunks.is_empty() {
            tracing::info!("No documents to add.");
            IngestOutcome::NothingToAdd
        } else {
            tracing::info!("Adding {} new documents in the DB...", chunks.len());
            tracing::info!(
                "Embedding with {} ({})",
                self.embedder.name(),
                self.embedder.model()
            );
            let entries = self.embed_chunks(chunks).await?;
            let count = entries.len();
            self.write_index(entries).await?;
            IngestOutcome::Indexed { chunks: count }
        };

        Ok(IngestReport {
            outcome,
            documents: documents.len(),
            cleared_previous,
            elapsed: start.elapsed(),
        })
    }

    async fn embed_chunks(&self, chunks: Vec<Chunk>) -> Result<Vec<(Chunk, Vec<f32>)>> {
        self.progress.set_length(chunks.len() as u64);
        self.progress.set_position(0);

        let mut entries = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let vector = match self.embedder.embed(&chunk.content).await {
                Ok(vector) => vector,
                Err(e) => {
                    self.progress.abandon();
                    return Err(e);
                }
            };
            tracing::debug!("Embedded chunk {} ({} -> page {})", chunk.id, chunk.source, chunk.page);
            entries.push((chunk, vector));
            self.progress.inc(1);
        }

        self.progress.finish_and_clear();
        Ok(entries)
    }

    async fn write_index(&self, entries: Vec<(Chunk, Vec<f32>)>) -> Result<()> {
        let db_path = self.config.paths.db_path.clone();
        let model = self.embedder.model().to_string();

        let info = tokio::task::spawn_blocking(move || VectorIndex::build(&db_path, &model, &entries))
            .await
            .map_err(|e| Error::internal(format!("Index task failed: {}", e)))??;

        tracing::info!(
            "Index written: {} chunks, {} dimensions, model {}",
            info.chunk_count,
            info.dimensions,
            info.embed_model
        );
        Ok(())
    }
}

/// Remove any existing index at `db_path`. Returns `true` if one was removed.
pub async fn clear_database(db_path: PathBuf) -> Result<bool> {
    if !db_path.exists() {
        return Ok(false);
    }

    tracing::info!("Clearing database...");
    tokio::task::spawn_blocking(move || VectorIndex::clear(&db_path))
        .await
        .map_err(|e| Error::internal(format!("Clear task failed: {}", e)))??;
    tracing::info!("Database cleared.");

    Ok(true)
}
