//! Persistent vector index backed by SQLite
//!
//! The index is a directory holding one database file. It is written once per
//! ingestion run, inside a single transaction, and only read afterwards.
//! Search is a flat cosine scan over every stored vector.

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Chunk;

/// Database file name inside the index directory
pub const INDEX_FILE: &str = "index.sqlite3";

/// A chunk returned by similarity search
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// The matched chunk
    pub chunk: Chunk,
    /// Cosine similarity to the query (-1.0 to 1.0, higher is more similar)
    pub similarity: f32,
}

/// Facts recorded when the index was built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    /// Embedding model that produced the stored vectors
    pub embed_model: String,
    /// Vector dimension
    pub dimensions: usize,
    /// Number of stored chunks
    pub chunk_count: usize,
    /// RFC 3339 build timestamp
    pub created_at: String,
}

/// Read-only handle on a built index
pub struct VectorIndex {
    conn: Connection,
    info: IndexInfo,
}

impl VectorIndex {
    /// Path of the database file for an index directory
    pub fn index_file(db_path: &Path) -> PathBuf {
        db_path.join(INDEX_FILE)
    }

    /// Whether an index has been built at `db_path`
    pub fn exists(db_path: &Path) -> bool {
        Self::index_file(db_path).is_file()
    }

    /// Remove the index directory and everything in it.
    ///
    /// Returns `true` if something was removed.
    pub fn clear(db_path: &Path) -> Result<bool> {
        if !db_path.exists() {
            return Ok(false);
        }
        std::fs::remove_dir_all(db_path)?;
        Ok(true)
    }

    /// Create a fresh index at `db_path` holding `entries`.
    ///
    /// All rows are committed together; an error leaves no readable index.
    pub fn build(db_path: &Path, embed_model: &str, entries: &[(Chunk, Vec<f32>)]) -> Result<IndexInfo> {
        let dimensions = match entries.first() {
            Some((_, vector)) if !vector.is_empty() => vector.len(),
            Some(_) => return Err(Error::vector_db("Chunk has no embedding")),
            None => return Err(Error::vector_db("Refusing to build an empty index")),
        };

        if let Some((chunk, vector)) = entries.iter().find(|(_, v)| v.len() != dimensions) {
            return Err(Error::vector_db(format!(
                "Embedding for chunk {} has dimension {}, expected {}",
                chunk.id,
                vector.len(),
                dimensions
            )));
        }

        let file = Self::index_file(db_path);
        if file.exists() {
            return Err(Error::vector_db(format!(
                "Index already exists at {}; clear it first",
                file.display()
            )));
        }
        std::fs::create_dir_all(db_path)?;

        let info = IndexInfo {
            embed_model: embed_model.to_string(),
            dimensions,
            chunk_count: entries.len(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let mut conn = Connection::open(&file)?;
        let result = Self::write_all(&mut conn, &info, entries);
        drop(conn);

        if let Err(e) = result {
            // Do not leave a half-created database behind.
            let _ = std::fs::remove_file(&file);
            return Err(e);
        }

        Ok(info)
    }

    fn write_all(conn: &mut Connection, info: &IndexInfo, entries: &[(Chunk, Vec<f32>)]) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE chunks (
                id TEXT PRIMARY KEY,
                position INTEGER NOT NULL,
                content TEXT NOT NULL,
                source TEXT NOT NULL,
                page INTEGER NOT NULL,
                chunk_index INTEGER NOT NULL,
                embedding BLOB NOT NULL
            );

            CREATE INDEX idx_chunks_position ON chunks(position);
            "#,
        )?;

        let tx = conn.transaction()?;
        {
            let mut meta = tx.prepare("INSERT INTO meta (key, value) VALUES (?1, ?2)")?;
            meta.execute(params!["embed_model", info.embed_model])?;
            meta.execute(params!["dimensions", info.dimensions.to_string()])?;
            meta.execute(params!["chunk_count", info.chunk_count.to_string()])?;
            meta.execute(params!["created_at", info.created_at])?;

            let mut insert = tx.prepare(
                "INSERT OR REPLACE INTO chunks (id, position, content, source, page, chunk_index, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (position, (chunk, vector)) in entries.iter().enumerate() {
                insert.execute(params![
                    chunk.id,
                    position as i64,
                    chunk.content,
                    chunk.source,
                    chunk.page,
                    chunk.chunk_index,
                    encode_vector(vector),
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    /// Open an existing index read-only; `None` if nothing has been built at `db_path`
    pub fn open(db_path: &Path) -> Result<Option<Self>> {
        let file = Self::index_file(db_path);
        if !file.is_file() {
            return Ok(None);
        }

        let conn = Connection::open_with_flags(
            &file,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let embed_model = read_meta(&conn, "embed_model")?;
        let dimensions = parse_meta(&read_meta(&conn, "dimensions")?, "dimensions")?;
        let chunk_count = parse_meta(&read_meta(&conn, "chunk_count")?, "chunk_count")?;
        let created_at = read_meta(&conn, "created_at")?;

        Ok(Some(Self {
            conn,
            info: IndexInfo {
                embed_model,
                dimensions,
                chunk_count,
                created_at,
            },
        }))
    }

    pub fn info(&self) -> &IndexInfo {
        &self.info
    }

    /// Number of stored chunks
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Return the `top_k` chunks most similar to `query`, best first.
    ///
    /// Equal scores keep insertion order.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>> {
        if query.len() != self.info.dimensions {
            return Err(Error::vector_db(format!(
                "Query embedding has dimension {}, index was built with {} ({})",
                query.len(),
                self.info.dimensions,
                self.info.embed_model
            )));
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, content, source, page, chunk_index, embedding FROM chunks ORDER BY position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                Chunk {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    source: row.get(2)?,
                    page: row.get(3)?,
                    chunk_index: row.get(4)?,
                },
                row.get::<_, Vec<u8>>(5)?,
            ))
        })?;

        let mut results = Vec::new();
        for row in rows {
            let (chunk, blob) = row?;
            let vector = decode_vector(&blob, self.info.dimensions)?;
            let similarity = cosine_similarity(query, &vector);
            results.push(RetrievedChunk { chunk, similarity });
        }

        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        results.truncate(top_k);

        Ok(results)
    }
}

fn read_meta(conn: &Connection, key: &str) -> Result<String> {
    conn.query_row("SELECT value FROM meta WHERE key = ?1", params![key], |row| row.get(0))
        .optional()?
        .ok_or_else(|| Error::vector_db(format!("Index is missing '{}' metadata", key)))
}

fn parse_meta(value: &str, key: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| Error::vector_db(format!("Invalid '{}' metadata: {}", key, value)))
}

fn encode_vector(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_vector(blob: &[u8], dimensions: usize) -> Result<Vec<f32>> {
    if blob.len() != dimensions * 4 {
        return Err(Error::vector_db(format!(
            "Stored embedding has {} bytes, expected {}",
            blob.len(),
            dimensions * 4
        )));
    }
    Ok(blob
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Cosine similarity; zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Document;

    fn entry(source: &str, page: u32, text: &str, vector: Vec<f32>) -> (Chunk, Vec<f32>) {
        let doc = Document::new(text, source, page);
        (Chunk::from_document(&doc, text.to_string(), 0), vector)
    }

    fn sample_entries() -> Vec<(Chunk, Vec<f32>)> {
        vec![
            entry("a.pdf", 1, "north", vec![1.0, 0.0, 0.0]),
            entry("a.pdf", 2, "east", vec![0.0, 1.0, 0.0]),
            entry("b.pdf", 1, "north-east", vec![0.7, 0.7, 0.0]),
            entry("b.pdf", 2, "up", vec![0.0, 0.0, 1.0]),
        ]
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_vector_codec() {
        let v = vec![0.25, -1.5, 3.0];
        assert_eq!(decode_vector(&encode_vector(&v), 3).unwrap(), v);
        assert!(decode_vector(&encode_vector(&v), 4).is_err());
    }

    #[test]
    fn test_open_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        assert!(VectorIndex::open(&dir.path().join("vectordb")).unwrap().is_none());
        assert!(!VectorIndex::exists(&dir.path().join("vectordb")));
    }

    #[test]
    fn test_build_and_search() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("vectordb");

        let info = VectorIndex::build(&db_path, "nomic-embed-text", &sample_entries()).unwrap();
        assert_eq!(info.dimensions, 3);
        assert_eq!(info.chunk_count, 4);

        let index = VectorIndex::open(&db_path).unwrap().unwrap();
        assert_eq!(index.info().embed_model, "nomic-embed-text");
        assert_eq!(index.len().unwrap(), 4);

        let results = index.search(&[1.0, 0.1, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "north");
        assert_eq!(results[1].chunk.content, "north-east");
        assert!(results[0].similarity >= results[1].similarity);
        assert_eq!(results[0].chunk.source, "a.pdf");
        assert_eq!(results[0].chunk.page, 1);
    }

    #[test]
    fn test_search_returns_all_when_k_exceeds_len() {
        let dir = tempfile::tempdir().unwrap();
        VectorIndex::build(dir.path(), "m", &sample_entries()).unwrap();
        let index = VectorIndex::open(dir.path()).unwrap().unwrap();
        assert_eq!(index.search(&[0.0, 0.0, 1.0], 10).unwrap().len(), 4);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![
            entry("a.pdf", 1, "first", vec![1.0, 0.0]),
            entry("a.pdf", 2, "second", vec![1.0, 0.0]),
            entry("a.pdf", 3, "third", vec![1.0, 0.0]),
        ];
        VectorIndex::build(dir.path(), "m", &entries).unwrap();
        let index = VectorIndex::open(dir.path()).unwrap().unwrap();

        let pages: Vec<u32> = index
            .search(&[1.0, 0.0], 3)
            .unwrap()
            .iter()
            .map(|r| r.chunk.page)
            .collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        VectorIndex::build(dir.path(), "m", &sample_entries()).unwrap();
        let index = VectorIndex::open(dir.path()).unwrap().unwrap();
        assert!(matches!(index.search(&[1.0, 0.0], 5), Err(Error::VectorDb(_))));
    }

    #[test]
    fn test_build_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("vectordb");

        assert!(VectorIndex::build(&db_path, "m", &[]).is_err());

        let mixed = vec![
            entry("a.pdf", 1, "x", vec![1.0, 0.0]),
            entry("a.pdf", 2, "y", vec![1.0, 0.0, 0.0]),
        ];
        assert!(matches!(
            VectorIndex::build(&db_path, "m", &mixed),
            Err(Error::VectorDb(_))
        ));
        assert!(!VectorIndex::exists(&db_path));
    }

    #[test]
    fn test_build_refuses_to_overwrite_and_clear_removes() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("vectordb");

        VectorIndex::build(&db_path, "m", &sample_entries()).unwrap();
        assert!(VectorIndex::build(&db_path, "m", &sample_entries()).is_err());

        assert!(VectorIndex::clear(&db_path).unwrap());
        assert!(!db_path.exists());
        assert!(!VectorIndex::clear(&db_path).unwrap());

        VectorIndex::build(&db_path, "m", &sample_entries()).unwrap();
        assert!(VectorIndex::exists(&db_path));
    }
}
