//! Prompt templates for RAG generation

use crate::retrieval::RetrievedChunk;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build context from search results: chunk texts separated by blank lines
    pub fn build_context(results: &[RetrievedChunk]) -> String {
        results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the full RAG prompt restricting the model to the given context
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Elaborate and answer the following question based only on the provided context.
Think step by step before providing an answer.
Please do not go out of context to answer the question, if the answer is not present in the given context then you dont have to answer the question.
<context> {context} </context>
Question : {question}"#,
            context = context,
            question = question,
        )
    }
}
