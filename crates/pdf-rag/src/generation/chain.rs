//! Retrieval chain: retrieve context, build the prompt, generate the answer

use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::{RetrievedChunk, Retriever};
use crate::types::QueryResponse;

use super::PromptBuilder;

/// Result of one chain invocation
#[derive(Debug, Clone)]
pub struct ChainOutput {
    /// Generated answer text
    pub answer: String,
    /// Chunks the answer was grounded on, best match first
    pub context: Vec<RetrievedChunk>,
}

/// Question answering over the vector index
pub struct RetrievalChain {
    retriever: Retriever,
    llm: Arc<dyn LlmProvider>,
}

impl RetrievalChain {
    pub fn new(retriever: Retriever, llm: Arc<dyn LlmProvider>) -> Self {
        Self { retriever, llm }
    }

    pub fn from_config(
        config: &RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self::new(Retriever::from_config(embedder, config), llm)
    }

    /// Answer `question` using the `top_k` most similar chunks.
    ///
    /// With no index on disk the model still runs, with an empty context.
    pub async fn invoke(&self, question: &str) -> Result<ChainOutput> {
        let context = self.retriever.retrieve(question).await?;
        tracing::debug!("Retrieved {} chunk(s) for question", context.len());

        let prompt = PromptBuilder::build_rag_prompt(question, &PromptBuilder::build_context(&context));
        let answer = self.llm.generate(&prompt).await?;

        Ok(ChainOutput { answer, context })
    }

    /// Invoke the chain and format the result with its wall-clock response time
    pub async fn ask(&self, question: &str) -> Result<QueryResponse> {
        let start = Instant::now();
        let output = self.invoke(question).await?;
        let response = QueryResponse::from_chain(&output, start.elapsed());

        tracing::info!(
            "Answered in {:.2}s using {} source(s)",
            response.response_time_secs,
            response.sources.len()
        );
        Ok(response)
    }
}
