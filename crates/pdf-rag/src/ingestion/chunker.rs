//! Recursive character text splitting with overlap
//!
//! Text is cut on the coarsest separator that occurs in it (paragraph, line,
//! word, then character). Pieces are merged back greedily up to `chunk_size`
//! characters, and each new chunk starts with at most `chunk_overlap`
//! characters carried over from the end of the previous one.

use std::collections::VecDeque;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

/// Separators tried in order; the empty string splits into characters.
const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Text splitter with configurable size and overlap
#[derive(Debug, Clone)]
pub struct RecursiveTextSplitter {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    chunk_overlap: usize,
    separators: Vec<&'static str>,
}

impl RecursiveTextSplitter {
    /// Create a new splitter
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than 0".to_string()));
        }
        if chunk_overlap > chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) is larger than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.to_vec(),
        })
    }

    /// Create from the chunking section of the config
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split every document, copying source and page onto each chunk
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for doc in documents {
            let pieces = self.split_text(&doc.content);
            tracing::debug!(
                "{} page {}: {} chunks",
                doc.source,
                doc.page,
                pieces.len()
            );
            chunks.extend(
                pieces
                    .into_iter()
                    .enumerate()
                    .map(|(i, text)| Chunk::from_document(doc, text, i as u32)),
            );
        }

        chunks
    }

    /// Split raw text into chunk strings
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[&'static str]) -> Vec<String> {
        // Pick the first separator present in the text; anything after it is
        // kept for pieces that are still too long.
        let mut separator = separators.last().copied().unwrap_or("");
        let mut remaining: &[&'static str] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = *candidate;
                break;
            }
            if text.contains(*candidate) {
                separator = *candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut final_chunks = Vec::new();
        let mut good_splits: Vec<&str> = Vec::new();

        for piece in split_keep_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                good_splits.push(piece);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }

            if remaining.is_empty() {
                final_chunks.push(piece.to_string());
            } else {
                final_chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    /// Greedily merge pieces into chunks no longer than `chunk_size`
    fn merge_splits(&self, splits: &[&str]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in splits {
            let len = char_len(piece);

            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total,
                        self.chunk_size
                    );
                }

                if !current.is_empty() {
                    if let Some(doc) = join_pieces(&current) {
                        docs.push(doc);
                    }

                    // Keep only a tail of at most `chunk_overlap` characters,
                    // and leave room for the incoming piece.
                    while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0)
                    {
                        match current.pop_front() {
                            Some(first) => total -= char_len(first),
                            None => break,
                        }
                    }
                }
            }

            current.push_back(piece);
            total += len;
        }

        if let Some(doc) = join_pieces(&current) {
            docs.push(doc);
        }

        docs
    }
}

/// Split on `separator`, attaching each separator to the start of the piece after it.
fn split_keep_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut last = 0;
    for (idx, _) in text.match_indices(separator) {
        pieces.push(&text[last..idx]);
        last = idx;
    }
    pieces.push(&text[last..]);
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn join_pieces(pieces: &VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter() -> RecursiveTextSplitter {
        RecursiveTextSplitter::new(1000, 200).unwrap()
    }

    /// Length of the longest prefix of `next` that is also a suffix of `prev`
    fn shared_overlap(prev: &str, next: &str) -> usize {
        let next_chars: Vec<char> = next.chars().collect();
        (1..=next_chars.len())
            .rev()
            .find(|&k| {
                let prefix: String = next_chars[..k].iter().collect();
                prev.ends_with(&prefix)
            })
            .unwrap_or(0)
    }

    #[test]
    fn test_rejects_overlap_larger_than_size() {
        assert!(matches!(
            RecursiveTextSplitter::new(100, 200),
            Err(Error::Config(_))
        ));
        assert!(RecursiveTextSplitter::new(0, 0).is_err());
        assert!(RecursiveTextSplitter::new(100, 100).is_ok());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = splitter().split_text("  Octane is fast.\n\nPathfinder grapples.  ");
        assert_eq!(chunks, vec!["Octane is fast.\n\nPathfinder grapples.".to_string()]);
    }

    #[test]
    fn test_empty_and_blank_text() {
        assert!(splitter().split_text("").is_empty());
        assert!(splitter().split_text("   \n\n  ").is_empty());
    }

    #[test]
    fn test_unbroken_text_falls_back_to_characters() {
        let text: String = (0..2500u32)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect();
        let chunks = splitter().split_text(&text);

        let lens: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(lens, vec![1000, 1000, 900]);
        assert_eq!(&chunks[1][..200], &chunks[0][800..]);
        assert_eq!(&chunks[2][..200], &chunks[1][800..]);
        assert_eq!(chunks[0], text[..1000]);
        assert_eq!(chunks[2], text[1600..]);
    }

    #[test]
    fn test_word_text_respects_size_and_overlap() {
        let text = (0..800)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let splitter = splitter();
        let chunks = splitter.split_text(&text);

        assert!(chunks.len() > 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1000);
            assert!(!chunk.starts_with(' '));
            assert!(!chunk.ends_with(' '));
        }
        for pair in chunks.windows(2) {
            let overlap = shared_overlap(&pair[0], &pair[1]);
            assert!(overlap > 0, "consecutive chunks should overlap");
            assert!(overlap <= 200);
        }
        // Every word survives the split.
        assert!(chunks.last().unwrap().ends_with("word799"));
        assert!(chunks.first().unwrap().starts_with("word0 "));
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let para_a = "A".repeat(600);
        let para_b = "B".repeat(600);
        let text = format!("{}\n\n{}", para_a, para_b);

        let chunks = splitter().split_text(&text);
        assert_eq!(chunks, vec![para_a, para_b]);
    }

    #[test]
    fn test_split_keep_separator() {
        assert_eq!(
            split_keep_separator("one two  three", " "),
            vec!["one", " two", " ", " three"]
        );
        assert_eq!(split_keep_separator("\n\n\n", "\n\n"), vec!["\n\n\n"]);
        assert_eq!(split_keep_separator("héllo", ""), vec!["h", "é", "l", "l", "o"]);
    }

    #[test]
    fn test_multibyte_text_counts_characters() {
        let text = "é".repeat(1500);
        let chunks = splitter().split_text(&text);
        assert_eq!(chunks[0].chars().count(), 1000);
        assert_eq!(chunks[1].chars().count(), 700);
    }

    #[test]
    fn test_split_documents_copies_metadata() {
        let docs = vec![
            Document::new("x".repeat(1500), "data/a.pdf", 1),
            Document::new("", "data/a.pdf", 2),
            Document::new("short page", "data/b.pdf", 1),
        ];

        let chunks = splitter().split_documents(&docs);
        assert_eq!(chunks.len(), 3);
        assert!(chunks[..2].iter().all(|c| c.source == "data/a.pdf" && c.page == 1));
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[1].chunk_index, 1);
        assert_eq!(chunks[2].source, "data/b.pdf");
        assert_eq!(chunks[2].content, "short page");
    }

    #[test]
    fn test_deterministic() {
        let text = (0..300).map(|i| format!("line {}\n", i)).collect::<String>();
        let s = splitter();
        assert_eq!(s.split_text(&text), s.split_text(&text));
    }
}
