//! Document ingestion pipeline: PDF loading, chunking, and index building

mod chunker;
pub mod loader;
mod pipeline;

pub use chunker::RecursiveTextSplitter;
pub use loader::{load_pdf, DocumentLoader};
pub use pipeline::{clear_database, IngestOutcome, IngestPipeline, IngestReport};
