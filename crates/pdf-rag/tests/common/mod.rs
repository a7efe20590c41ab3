//! Shared fixtures: deterministic providers and generated PDFs

#![allow(dead_code)]

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use std::path::Path;
use std::sync::Mutex;

use pdf_rag::providers::{EmbeddingProvider, LlmProvider};
use pdf_rag::{RagConfig, Result};

pub const DIMENSIONS: usize = 256;

/// Hashed bag-of-words embedding; texts sharing words score higher
pub struct BagOfWordsEmbedder;

#[async_trait]
impl EmbeddingProvider for BagOfWordsEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(bag_of_words(text))
    }

    fn model(&self) -> &str {
        "bag-of-words"
    }

    fn name(&self) -> &str {
        "test"
    }
}

pub fn bag_of_words(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0; DIMENSIONS];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1)
    {
        vector[fnv1a(&word.to_lowercase()) % DIMENSIONS] += 1.0;
    }
    vector
}

fn fnv1a(word: &str) -> usize {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in word.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash as usize
}

/// Records every prompt and answers with a fixed string
#[derive(Default)]
pub struct RecordingLlm {
    prompts: Mutex<Vec<String>>,
}

impl RecordingLlm {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for RecordingLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("Pathfinder uses a grappling hook.".to_string())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "test"
    }

    fn model(&self) -> &str {
        "recording"
    }
}

pub const LEGEND_PAGES: [&str; 3] = [
    "Lifeline deploys a healing drone for her squad.",
    "Pathfinder uses a grappling hook to reach high ground.",
    "Caustic places gas traps around buildings.",
];

/// Write a PDF with one line of text per page
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Config pointing at `root/data` and `root/vectordb`, with the data directory created
pub fn config_in(root: &Path) -> RagConfig {
    let config = RagConfig::default()
        .with_data_path(root.join("data"))
        .with_db_path(root.join("vectordb"));
    std::fs::create_dir_all(&config.paths.data_path).unwrap();
    config
}
