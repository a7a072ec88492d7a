//! In-process stand-ins for the hosted services, plus a PDF writer for tests.

use crate::embedding::Embedder;
use crate::error::{PdfChatError, Result};
use crate::llm::ChatModel;
use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

const DIMENSIONS: usize = 256;

/// Bag-of-words embedder: each lowercase word is hashed into one of 256 buckets.
pub struct KeywordEmbedder;

fn bucket(word: &str) -> usize {
    // FNV-1a
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in word.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % DIMENSIONS as u64) as usize
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            vector[bucket(&word.to_lowercase())] += 1.0;
        }
        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// Chat model that answers with the prompt it was given.
pub struct EchoChatModel;

#[async_trait]
impl ChatModel for EchoChatModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }

    fn model(&self) -> &str {
        "echo"
    }
}

/// Chat model whose every call fails like an unreachable API.
pub struct FailingChatModel;

#[async_trait]
impl ChatModel for FailingChatModel {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(PdfChatError::OpenAI("connection refused".to_string()))
    }

    fn model(&self) -> &str {
        "failing"
    }
}

/// Write a PDF with one page per entry of `pages`, each holding a single line of text.
pub fn write_pdf(path: &Path, pages: &[&str]) {
    std::fs::write(path, pdf_bytes(pages)).unwrap();
}

/// Build the bytes of a PDF with one page per entry of `pages`.
pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
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
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn test_keyword_buckets_do_not_collide_for_fixture_words() {
    let words = [
        "wat", "is", "de", "deadline", "maart", "budget", "euro", "april", "fietsen", "bussen",
        "hoeveel", "zijn", "er", "nodig", "treinstellen", "treinen",
    ];
    let mut seen = std::collections::HashSet::new();
    for word in words {
        assert!(seen.insert(bucket(word)), "bucket collision for {}", word);
    }
}
