//! PDF directory loader producing one [`Document`] per page

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::PathsConfig;
use crate::error::{Error, Result};
use crate::types::Document;

/// Typographic characters that PDF fonts commonly emit, mapped to plain text
const CHAR_REPLACEMENTS: &[(char, &str)] = &[
    ('\u{2010}', "-"),   // Hyphen
    ('\u{2011}', "-"),   // Non-breaking hyphen
    ('\u{2013}', "-"),   // En dash
    ('\u{2014}', "--"),  // Em dash
    ('\u{2018}', "'"),   // Left single quote
    ('\u{2019}', "'"),   // Right single quote
    ('\u{201C}', "\""),  // Left double quote
    ('\u{201D}', "\""),  // Right double quote
    ('\u{2022}', "* "),  // Bullet
    ('\u{2026}', "..."), // Ellipsis
    ('\u{00A0}', " "),   // Non-breaking space
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\0', ""),
];

/// Loads every PDF under a directory
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    data_path: PathBuf,
    recursive: bool,
}

impl DocumentLoader {
    /// Create a loader for `data_path`
    pub fn new(data_path: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            data_path: data_path.into(),
            recursive,
        }
    }

    /// Create from the paths section of the config
    pub fn from_config(config: &PathsConfig) -> Self {
        Self::new(config.data_path.clone(), config.recursive)
    }

    /// List the PDF files to load, in sorted path order
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.data_path.is_dir() {
            return Err(Error::DataDirNotFound(self.data_path.clone()));
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.data_path)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() && is_pdf(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Load every page of every PDF. Any unreadable file aborts the load.
    pub fn load(&self) -> Result<Vec<Document>> {
        let files = self.discover()?;
        tracing::info!(
            "Loading {} PDF file(s) from {}",
            files.len(),
            self.data_path.display()
        );

        let mut documents = Vec::new();
        for path in &files {
            let pages = load_pdf(path)?;
            tracing::debug!("{}: {} page(s)", path.display(), pages.len());
            documents.extend(pages);
        }

        Ok(documents)
    }
}

/// Load a single PDF, one document per page
pub fn load_pdf(path: &Path) -> Result<Vec<Document>> {
    let source = path.display().to_string();
    let data = std::fs::read(path)?;

    let pages = match extract_pages(&data) {
        Ok(pages) => pages,
        Err(e) => {
            tracing::warn!("pdf-extract failed on {}: {}, trying fallback", source, e);
            extract_pages_fallback(&data, &source).map_err(|e| Error::file_parse(&source, e))?
        }
    };

    Ok(pages
        .into_iter()
        .enumerate()
        .map(|(i, text)| Document::new(cleanup_pdf_text(&text), source.clone(), i as u32 + 1))
        .collect())
}

fn extract_pages(data: &[u8]) -> std::result::Result<Vec<String>, String> {
    // pdf-extract panics on some malformed fonts instead of returning an error.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(data)) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("extractor panicked".to_string()),
    }
}

/// Page-by-page extraction using lopdf directly.
///
/// A page whose text cannot be decoded is kept as an empty page so later
/// page numbers stay aligned.
fn extract_pages_fallback(data: &[u8], source: &str) -> std::result::Result<Vec<String>, String> {
    let doc = lopdf::Document::load_mem(data).map_err(|e| format!("Failed to load PDF: {}", e))?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys() {
        let text = doc.extract_text(&[*page_number]).unwrap_or_else(|e| {
            tracing::warn!(
                "{}: could not extract text from page {}, keeping it empty: {}",
                source,
                page_number,
                e
            );
            String::new()
        });
        pages.push(text);
    }

    Ok(pages)
}

/// Replace typographic glyphs and strip NUL bytes
fn cleanup_pdf_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match CHAR_REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => result.push_str(to),
            None => result.push(c),
        }
    }
    result
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
