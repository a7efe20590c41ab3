//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::RetrievalChain;
use crate::providers::{EmbeddingProvider, LlmProvider, OllamaProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    llm_provider: Arc<dyn LlmProvider>,
}

impl AppState {
    /// Create state backed by the Ollama server in `config.llm`
    pub fn new(config: RagConfig) -> Result<Self> {
        let (embedder, llm) = OllamaProvider::new(&config.llm)?.split();
        tracing::info!("Ollama at {}", config.llm.base_url);
        Ok(Self::with_providers(config, Arc::new(embedder), Arc::new(llm)))
    }

    /// Create state with explicit providers
    pub fn with_providers(
        config: RagConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        llm_provider: Arc<dyn LlmProvider>,
    ) -> Self {
        tracing::info!(
            "Embeddings: {} ({}), generation: {} ({})",
            embedding_provider.name(),
            embedding_provider.model(),
            llm_provider.name(),
            llm_provider.model()
        );
        Self {
            inner: Arc::new(AppStateInner {
                config,
                embedding_provider,
                llm_provider,
            }),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn llm_provider(&self) -> Arc<dyn LlmProvider> {
        Arc::clone(&self.inner.llm_provider)
    }

    /// Build a chain for one query; the index is reopened each time
    pub fn chain(&self) -> RetrievalChain {
        RetrievalChain::from_config(
            &self.inner.config,
            Arc::clone(&self.inner.embedding_provider),
            Arc::clone(&self.inner.llm_provider),
        )
    }
}
