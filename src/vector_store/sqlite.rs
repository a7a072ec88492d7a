//! SQLite-based vector store implementation.
//!
//! Embeddings are stored as little-endian f32 blobs and cosine similarity is
//! computed in Rust. A single document's chunks fit comfortably in memory,
//! so every search is a full scan.

use super::{rank, Document, SearchResult, VectorStore};
use crate::error::{PdfChatError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

/// File name of the index database inside the index directory.
pub const INDEX_FILE: &str = "index.sqlite3";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        id TEXT PRIMARY KEY,
        source TEXT NOT NULL,
        page INTEGER NOT NULL,
        content TEXT NOT NULL,
        embedding BLOB NOT NULL,
        chunk_order INTEGER NOT NULL,
        indexed_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_documents_order ON documents(chunk_order);
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) an index inside `dir`.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn open_dir(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(INDEX_FILE);

        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| PdfChatError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding
            .iter()
            .flat_map(|f| f.to_le_bytes())
            .collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, docs), fields(count = docs.len()))]
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        for doc in docs {
            let embedding_bytes = Self::embedding_to_bytes(&doc.embedding);

            tx.execute(
                r#"
                INSERT OR REPLACE INTO documents
                (id, source, page, content, embedding, chunk_order, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    doc.id.to_string(),
                    doc.source,
                    doc.page,
                    doc.content,
                    embedding_bytes,
                    doc.chunk_order,
                    doc.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} documents", docs.len());
        Ok(docs.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, source, page, content, embedding, chunk_order, indexed_at
            FROM documents
            "#,
        )?;

        let docs = stmt.query_map([], |row| {
            let id_str: String = row.get(0)?;
            let embedding_bytes: Vec<u8> = row.get(4)?;
            let indexed_at_str: String = row.get(6)?;

            Ok(Document {
                id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
                source: row.get(1)?,
                page: row.get(2)?,
                content: row.get(3)?,
                embedding: Self::bytes_to_embedding(&embedding_bytes),
                chunk_order: row.get(5)?,
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        let docs: Vec<Document> = docs.collect::<std::result::Result<_, _>>()?;
        let results = rank(query_embedding, docs, limit);

        debug!("Found {} matching documents", results.len());
        Ok(results)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_vector_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteVectorStore::open_dir(dir.path()).unwrap();

        let doc = Document::new(
            "bestek.pdf".to_string(),
            3,
            "This is test content".to_string(),
            vec![1.0, 0.0, 0.0],
            0,
        );

        assert_eq!(store.upsert_batch(&[doc]).await.unwrap(), 1);

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 0.001);
        assert_eq!(results[0].document.page, 3);
        assert_eq!(results[0].document.source, "bestek.pdf");
        assert!(dir.path().join(INDEX_FILE).exists());
    }

    #[tokio::test]
    async fn test_index_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("chroma_db");

        {
            let store = SqliteVectorStore::open_dir(&index_dir).unwrap();
            let doc = Document::new("a.pdf".into(), 1, "kept".into(), vec![0.5, 0.5], 0);
            store.upsert_batch(&[doc]).await.unwrap();
        }

        let reopened = SqliteVectorStore::open_dir(&index_dir).unwrap();
        let results = reopened.search(&[0.5, 0.5], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.content, "kept");
    }

    #[test]
    fn test_embedding_bytes_roundtrip() {
        let embedding = vec![0.25f32, -1.5, 3.0];
        let bytes = SqliteVectorStore::embedding_to_bytes(&embedding);
        assert_eq!(bytes.len(), 12);
        assert_eq!(SqliteVectorStore::bytes_to_embedding(&bytes), embedding);
    }
}
