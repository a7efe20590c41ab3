//! Query-time retrieval against the on-disk index

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;

use super::{RetrievedChunk, VectorIndex};

/// Embeds questions and looks them up in the index
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    db_path: PathBuf,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, db_path: impl Into<PathBuf>, top_k: usize) -> Self {
        Self {
            embedder,
            db_path: db_path.into(),
            top_k,
        }
    }

    pub fn from_config(embedder: Arc<dyn EmbeddingProvider>, config: &RagConfig) -> Self {
        Self::new(embedder, config.paths.db_path.clone(), config.retrieval.top_k)
    }

    /// Return up to `top_k` chunks for `question`, most similar first.
    ///
    /// The index is reopened on every call so a rebuild is picked up without
    /// a restart. A missing index yields no chunks.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedChunk>> {
        if !VectorIndex::exists(&self.db_path) {
            tracing::warn!(
                "No vector index at {}; answering without context",
                self.db_path.display()
            );
            return Ok(Vec::new());
        }

        let query = self.embedder.embed(question).await?;

        let db_path = self.db_path.clone();
        let top_k = self.top_k;
        let model = self.embedder.model().to_string();

        tokio::task::spawn_blocking(move || -> Result<Vec<RetrievedChunk>> {
            let Some(index) = VectorIndex::open(&db_path)? else {
                return Ok(Vec::new());
            };
            if index.info().embed_model != model {
                tracing::warn!(
                    "Index was built with '{}' but queries use '{}'",
                    index.info().embed_model,
                    model
                );
            }
            index.search(&query, top_k)
        })
        .await
        .map_err(|e| Error::internal(format!("Search task failed: {}", e)))?
    }
}
