//! Document and chunk types with source tracking for citations

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One page of a loaded PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Extracted page text
    pub content: String,
    /// Path of the source file as discovered under the data directory
    pub source: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Document {
    pub fn new(content: impl Into<String>, source: impl Into<String>, page: u32) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            page,
        }
    }
}

/// A bounded text window cut from a [`Document`], the unit of embedding and retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Content-derived identifier, stable across re-ingestion of the same file
    pub id: String,
    /// Chunk text
    pub content: String,
    /// Source file path, copied from the document
    pub source: String,
    /// Page number, copied from the document
    pub page: u32,
    /// Position of this chunk within its document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a chunk carrying the metadata of `doc`
    pub fn from_document(doc: &Document, content: String, chunk_index: u32) -> Self {
        let id = chunk_id(&doc.source, doc.page, chunk_index, &content);
        Self {
            id,
            content,
            source: doc.source.clone(),
            page: doc.page,
            chunk_index,
        }
    }

    /// Citation string shown to the user
    pub fn citation(&self) -> String {
        super::response::format_source(&self.source, self.page)
    }
}

fn chunk_id(source: &str, page: u32, chunk_index: u32, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(page.to_le_bytes());
    hasher.update(chunk_index.to_le_bytes());
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
