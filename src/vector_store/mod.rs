//! Vector store abstraction for pdfchat.
//!
//! Provides a trait-based interface for different vector index backends.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::chunking::DocumentChunk;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An embedded chunk stored in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID.
    pub id: Uuid,
    /// File name of the source PDF.
    pub source: String,
    /// 1-based page the chunk came from.
    pub page: u32,
    /// Text content of this chunk.
    pub content: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// Order of this chunk in the document.
    pub chunk_order: i32,
    /// When this document was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document.
    pub fn new(source: String, page: u32, content: String, embedding: Vec<f32>, chunk_order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            page,
            content,
            embedding,
            chunk_order,
            indexed_at: Utc::now(),
        }
    }

    /// Create a document from a chunk and its embedding.
    pub fn from_chunk(chunk: DocumentChunk, embedding: Vec<f32>) -> Self {
        Self::new(chunk.source, chunk.page, chunk.content, embedding, chunk.order)
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Bulk insert documents.
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize>;

    /// Return the `limit` most similar documents, best first.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Score documents against a query and keep the `limit` best.
pub(crate) fn rank(
    query_embedding: &[f32],
    docs: impl IntoIterator<Item = Document>,
    limit: usize,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = docs
        .into_iter()
        .map(|doc| {
            let score = cosine_similarity(query_embedding, &doc.embedding);
            SearchResult { document: doc, score }
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.document.chunk_order.cmp(&b.document.chunk_order))
    });
    results.truncate(limit);
    results
}
