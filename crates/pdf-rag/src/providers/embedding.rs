//! Embedding provider trait for generating text embeddings

use async_trait::async_trait;

use crate::error::Result;

/// Trait for generating text embeddings
///
/// Ingestion and query must use the same provider and model, otherwise the
/// similarity scores between stored chunks and questions are meaningless.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Model identifier recorded in the index
    fn model(&self) -> &str;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
