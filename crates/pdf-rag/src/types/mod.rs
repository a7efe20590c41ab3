//! Core types for the RAG system

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document};
pub use query::{PageQuery, QueryRequest};
pub use response::{format_source, get_unique_sources, QueryResponse};
