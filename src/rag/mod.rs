//! RAG (Retrieval-Augmented Generation) for answering questions about the uploaded PDF.

pub mod context;
mod response;

pub use context::Retriever;
pub use response::{RagEngine, RagResponse, NO_RELEVANT_ANSWER};

use crate::vector_store::SearchResult;
use serde::Serialize;

/// A retrieved chunk as used for prompting and display.
#[derive(Debug, Clone, Serialize)]
pub struct ContextChunk {
    /// Source file name.
    pub source: String,
    /// 1-based page number.
    pub page: u32,
    /// Text content.
    pub content: String,
    /// Similarity score.
    pub score: f32,
}

impl From<SearchResult> for ContextChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            source: result.document.source,
            page: result.document.page,
            content: result.document.content,
            score: result.score,
        }
    }
}
