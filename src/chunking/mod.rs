//! Splitting extracted page text into chunks for embedding.

mod recursive;

pub use recursive::RecursiveCharacterSplitter;

use serde::{Deserialize, Serialize};

/// A bounded span of page text ready for embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Text content of this chunk.
    pub content: String,
    /// File name of the source document.
    pub source: String,
    /// 1-based page number the chunk was taken from.
    pub page: u32,
    /// Order of this chunk in the document.
    pub order: i32,
}

impl DocumentChunk {
    /// Create a new document chunk.
    pub fn new(content: String, source: String, page: u32, order: i32) -> Self {
        Self {
            content,
            source,
            page,
            order,
        }
    }
}
