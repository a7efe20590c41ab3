//! Response types for RAG queries

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::generation::ChainOutput;

/// Format a citation as `"<source> -> page <page>"`
pub fn format_source(source: &str, page: u32) -> String {
    format!("{} -> page {}", source, page)
}

/// Drop repeated citation strings, keeping the first occurrence of each in order
pub fn get_unique_sources<S: AsRef<str>>(sources: &[S]) -> Vec<String> {
    let mut uniques: Vec<String> = Vec::with_capacity(sources.len());
    for source in sources {
        let source = source.as_ref();
        if !uniques.iter().any(|u| u == source) {
            uniques.push(source.to_string());
        }
    }
    uniques
}

/// Answer shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer text
    pub answer: String,
    /// Wall-clock time spent on retrieval and generation, in seconds
    pub response_time_secs: f64,
    /// Deduplicated citations in first-seen order
    pub sources: Vec<String>,
}

impl QueryResponse {
    /// Wrap a chain result with its elapsed time and deduplicated citations
    pub fn from_chain(output: &ChainOutput, elapsed: Duration) -> Self {
        let citations: Vec<String> = output.context.iter().map(|r| r.chunk.citation()).collect();

        Self {
            answer: output.answer.clone(),
            response_time_secs: elapsed.as_secs_f64(),
            sources: get_unique_sources(&citations),
        }
    }
}
