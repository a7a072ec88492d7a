//! Retrieval of context chunks for a question.

use super::ContextChunk;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::VectorStore;
use std::sync::Arc;
use tracing::debug;

/// Default number of chunks returned per question.
pub const DEFAULT_TOP_K: usize = 100;

/// Returns the top-K chunks most similar to a question.
#[derive(Clone)]
pub struct Retriever {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    /// Create a new retriever.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the number of chunks returned.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Retrieve the chunks most relevant to `query`.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ContextChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = self.vector_store.search(&query_embedding, self.top_k).await?;
        debug!("Retrieved {} chunks for query", results.len());

        Ok(results.into_iter().map(ContextChunk::from).collect())
    }
}

/// Join chunk texts into the prompt context.
pub fn format_context_for_prompt(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::KeywordEmbedder;
    use crate::vector_store::{Document, MemoryVectorStore};

    #[tokio::test]
    async fn test_retrieve_respects_top_k() {
        let embedder = Arc::new(KeywordEmbedder);
        let store = Arc::new(MemoryVectorStore::new());

        let texts = ["deadline maart", "budget euro", "deadline april"];
        let mut docs = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            let embedding = embedder.embed(text).await.unwrap();
            docs.push(Document::new("a.pdf".into(), 1, text.to_string(), embedding, i as i32));
        }
        store.upsert_batch(&docs).await.unwrap();

        let retriever = Retriever::new(store, embedder).with_top_k(2);
        let chunks = retriever.retrieve("wat is de deadline").await.unwrap();

        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.content.contains("deadline")));
    }

    #[test]
    fn test_format_context_joins_with_blank_line() {
        let chunks = vec![
            ContextChunk {
                source: "a.pdf".into(),
                page: 1,
                content: "eerste".into(),
                score: 0.9,
            },
            ContextChunk {
                source: "a.pdf".into(),
                page: 2,
                content: "tweede".into(),
                score: 0.8,
            },
        ];

        assert_eq!(format_context_for_prompt(&chunks), "eerste\n\ntweede");
    }
}
