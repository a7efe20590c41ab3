//! Vector index and similarity retrieval

pub mod index;
pub mod retriever;

pub use index::{cosine_similarity, IndexInfo, RetrievedChunk, VectorIndex, INDEX_FILE};
pub use retriever::Retriever;
