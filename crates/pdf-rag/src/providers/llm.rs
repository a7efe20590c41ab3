//! LLM provider trait for generating answers

use async_trait::async_trait;

use crate::error::Result;

/// Trait for text generation from a fully assembled prompt
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run the model on `prompt` and return its completion
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
