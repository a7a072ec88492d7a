//! In-memory vector store implementation.
//!
//! Nothing is persisted; useful for testing and for running without a disk index.

use super::{rank, Document, SearchResult, VectorStore};
use crate::error::{PdfChatError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory vector store.
pub struct MemoryVectorStore {
    documents: RwLock<HashMap<Uuid, Document>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> PdfChatError {
    PdfChatError::VectorStore(format!("Failed to acquire lock: {}", e))
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let mut store = self.documents.write().map_err(poisoned)?;
        for doc in docs {
            store.insert(doc.id, doc.clone());
        }
        Ok(docs.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let docs = self.documents.read().map_err(poisoned)?;
        Ok(rank(query_embedding, docs.values().cloned(), limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new();

        let doc1 = Document::new(
            "offerte.pdf".to_string(),
            1,
            "Hello world".to_string(),
            vec![1.0, 0.0, 0.0],
            0,
        );

        let doc2 = Document::new(
            "offerte.pdf".to_string(),
            2,
            "Goodbye world".to_string(),
            vec![0.0, 1.0, 0.0],
            1,
        );

        assert_eq!(store.upsert_batch(&[doc1, doc2]).await.unwrap(), 2);

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].document.page, 1);

        let top = store.search(&[0.0, 1.0, 0.0], 1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].document.content, "Goodbye world");
    }
}
