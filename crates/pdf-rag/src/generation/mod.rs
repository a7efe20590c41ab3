//! Answer generation module

pub mod chain;
pub mod ollama;
pub mod prompt;

pub use chain::{ChainOutput, RetrievalChain};
pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
