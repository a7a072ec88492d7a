//! Single-document question answering.
//!
//! `PdfQuery` ties the pipeline together: a PDF is loaded page by page,
//! split, embedded and written to a fresh index; questions are answered from
//! the chunks retrieved from that index. Only one document is indexed at a
//! time; ingesting a new file destroys the previous index first.

use crate::chunking::{DocumentChunk, RecursiveCharacterSplitter};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{PdfChatError, Result, MSG_NO_DOCUMENT};
use crate::llm::{ChatModel, OpenAIChatModel};
use crate::openai::create_client_from_settings;
use crate::pdf::{self, Page};
use crate::rag::{RagEngine, RagResponse, Retriever};
use crate::vector_store::{Document, MemoryVectorStore, SqliteVectorStore, VectorStore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Where the vector index lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBackend {
    /// SQLite index inside a directory that is wiped on every ingest.
    Persistent { dir: PathBuf },
    /// Index held in memory only.
    InMemory,
}

impl IndexBackend {
    /// Pick the backend named in the settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        match settings.vector_store.provider.to_lowercase().as_str() {
            "sqlite" => Ok(IndexBackend::Persistent {
                dir: settings.index_dir(),
            }),
            "memory" => Ok(IndexBackend::InMemory),
            other => Err(PdfChatError::Config(format!(
                "Unknown vector store provider: {}",
                other
            ))),
        }
    }

    fn open(&self) -> Result<Arc<dyn VectorStore>> {
        match self {
            IndexBackend::Persistent { dir } => Ok(Arc::new(SqliteVectorStore::open_dir(dir)?)),
            IndexBackend::InMemory => Ok(Arc::new(MemoryVectorStore::new())),
        }
    }

    /// Delete the persisted index, if any. Returns whether anything was removed.
    fn destroy(&self) -> std::io::Result<bool> {
        match self {
            IndexBackend::Persistent { dir } if dir.exists() => {
                std::fs::remove_dir_all(dir)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Summary of the currently indexed document.
#[derive(Debug, Clone, Serialize)]
pub struct IndexedDocument {
    /// File name the document was loaded from.
    pub name: String,
    /// Number of pages in the PDF.
    pub pages: usize,
    /// Number of chunks in the index.
    pub chunks: usize,
    pub indexed_at: DateTime<Utc>,
}

/// Question answering over one uploaded PDF.
pub struct PdfQuery {
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
    splitter: RecursiveCharacterSplitter,
    prompts: Prompts,
    backend: IndexBackend,
    top_k: usize,
    engine: Option<RagEngine>,
    document: Option<IndexedDocument>,
}

impl PdfQuery {
    /// Build the pipeline against the hosted OpenAI services.
    pub fn new(settings: &Settings, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(PdfChatError::Config(
                "OpenAI API key must be provided or set in environment variables".to_string(),
            ));
        }

        let client = create_client_from_settings(api_key, &settings.openai)?;
        let embedder = Arc::new(OpenAIEmbedder::from_settings(client.clone(), &settings.embedding));
        let chat = Arc::new(OpenAIChatModel::for_answers(client, &settings.rag));

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        Ok(Self::with_components(
            embedder,
            chat,
            RecursiveCharacterSplitter::from_settings(&settings.chunking)?,
            IndexBackend::from_settings(settings)?,
        )
        .with_prompts(prompts)
        .with_top_k(settings.rag.top_k))
    }

    /// Build the pipeline from explicit components.
    pub fn with_components(
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
        splitter: RecursiveCharacterSplitter,
        backend: IndexBackend,
    ) -> Self {
        Self {
            embedder,
            chat,
            splitter,
            prompts: Prompts::default(),
            backend,
            top_k: crate::rag::context::DEFAULT_TOP_K,
            engine: None,
            document: None,
        }
    }

    /// Set custom prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set the number of chunks retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Whether a document is currently indexed.
    pub fn has_document(&self) -> bool {
        self.engine.is_some()
    }

    /// The currently indexed document.
    pub fn document(&self) -> Option<&IndexedDocument> {
        self.document.as_ref()
    }

    /// Index a PDF, replacing whatever was indexed before.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn ingest(&mut self, path: &Path) -> Result<IndexedDocument> {
        info!("Starting ingestion for file: {}", path.display());

        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PdfChatError::FileNotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.len() == 0 {
            return Err(PdfChatError::EmptyFile(path.display().to_string()));
        }

        self.engine = None;
        self.document = None;
        match self.backend.destroy() {
            Ok(true) => info!("Cleared previous vector store"),
            Ok(false) => {}
            Err(e) => error!("Error clearing previous vector store: {}", e),
        }

        let owned = path.to_path_buf();
        let pages = tokio::task::spawn_blocking(move || pdf::load_pages(&owned))
            .await
            .map_err(|e| PdfChatError::PdfRead(format!("PDF loader task failed: {}", e)))??;

        if !pages.iter().any(Page::has_text) {
            return Err(PdfChatError::EmptyExtraction);
        }

        let chunks = self.splitter.split_pages(&pages);
        info!("Split documents into {} chunks", chunks.len());
        if chunks.is_empty() {
            return Err(PdfChatError::EmptySplit);
        }

        let store = self.backend.open().map_err(PdfChatError::processing)?;
        let indexed = self
            .index_chunks(store.as_ref(), chunks)
            .await
            .map_err(PdfChatError::processing)?;

        let retriever = Retriever::new(store, self.embedder.clone()).with_top_k(self.top_k);
        self.engine = Some(
            RagEngine::new(retriever, self.chat.clone()).with_prompts(self.prompts.clone()),
        );

        let document = IndexedDocument {
            name: pages
                .first()
                .map(|p| p.source.clone())
                .unwrap_or_else(|| path.display().to_string()),
            pages: pages.len(),
            chunks: indexed,
            indexed_at: Utc::now(),
        };
        self.document = Some(document.clone());

        info!("Vector store initialized successfully");
        Ok(document)
    }

    async fn index_chunks(
        &self,
        store: &dyn VectorStore,
        chunks: Vec<DocumentChunk>,
    ) -> Result<usize> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(PdfChatError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let documents: Vec<Document> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| Document::from_chunk(chunk, embedding))
            .collect();

        store.upsert_batch(&documents).await
    }

    /// Answer a question about the indexed document.
    #[instrument(skip(self))]
    pub async fn ask(&self, question: &str) -> Result<RagResponse> {
        let Some(engine) = &self.engine else {
            warn!("No document has been ingested yet");
            return Ok(RagResponse {
                answer: MSG_NO_DOCUMENT.to_string(),
                sources: Vec::new(),
            });
        };

        engine.ask(question).await.inspect_err(|e| {
            error!("Error during question processing: {}", e);
        })
    }

    /// Drop the index handle and delete the persisted index.
    pub fn forget(&mut self) -> Result<()> {
        self.engine = None;
        self.document = None;
        if self.backend.destroy()? {
            info!("Cleared previous vector store");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MSG_NO_DOCUMENT;
    use crate::test_support::{write_pdf, EchoChatModel, FailingChatModel, KeywordEmbedder};
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    fn query_in(dir: &TempDir, chat: Arc<dyn ChatModel>) -> PdfQuery {
        let splitter = RecursiveCharacterSplitter::new(
            16000,
            3200,
            ["\n\n", "\n", ".", " ", ""].iter().map(|s| s.to_string()).collect(),
        )
        .unwrap();

        PdfQuery::with_components(
            Arc::new(KeywordEmbedder),
            chat,
            splitter,
            IndexBackend::Persistent {
                dir: dir.path().join("chroma_db"),
            },
        )
    }

    #[tokio::test]
    async fn test_ask_before_ingest_returns_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let query = query_in(&dir, Arc::new(EchoChatModel));

        let response = query.ask("Wat is de deadline?").await.unwrap();
        assert_eq!(response.answer, MSG_NO_DOCUMENT);
        assert!(!query.has_document());
    }

    #[tokio::test]
    async fn test_ingest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut query = query_in(&dir, Arc::new(EchoChatModel));

        let err = query.ingest(&dir.path().join("absent.pdf")).await.unwrap_err();
        assert!(matches!(err, PdfChatError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_ingest_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        std::fs::write(&path, b"").unwrap();
        let mut query = query_in(&dir, Arc::new(EchoChatModel));

        let err = query.ingest(&path).await.unwrap_err();
        assert!(matches!(err, PdfChatError::EmptyFile(_)));
    }

    #[tokio::test]
    async fn test_ingest_unreadable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 this is not really a pdf").unwrap();
        let mut query = query_in(&dir, Arc::new(EchoChatModel));

        let err = query.ingest(&path).await.unwrap_err();
        assert!(matches!(err, PdfChatError::PdfRead(_)));
        assert!(!query.has_document());
    }

    #[tokio::test]
    async fn test_ingest_blank_pdf_reports_empty_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.pdf");
        write_pdf(&path, &[" "]);
        let mut query = query_in(&dir, Arc::new(EchoChatModel));

        let err = query.ingest(&path).await.unwrap_err();
        assert!(matches!(err, PdfChatError::EmptyExtraction));
    }

    #[tokio::test]
    async fn test_ingest_then_ask_uses_document_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bestek.pdf");
        write_pdf(&path, &["De deadline is in maart", "Het budget is 10 euro"]);
        let mut query = query_in(&dir, Arc::new(EchoChatModel));

        let document = query.ingest(&path).await.unwrap();
        assert_eq!(document.name, "bestek.pdf");
        assert_eq!(document.pages, 2);
        assert_eq!(document.chunks, 2);
        assert!(dir.path().join("chroma_db").exists());

        let response = query.ask("Wat is de deadline?").await.unwrap();
        assert!(response.answer.contains("deadline"));
        assert!(response.answer.contains("maart"));
        assert!(response.answer.contains("Vraag: Wat is de deadline?"));
    }

    #[tokio::test]
    async fn test_second_ingest_discards_first_index() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.pdf");
        let second = dir.path().join("second.pdf");
        write_pdf(&first, &["De deadline is in maart"]);
        write_pdf(&second, &["Er zijn fietsen nodig"]);
        let mut query = query_in(&dir, Arc::new(EchoChatModel));

        assert_ok!(query.ingest(&first).await);
        assert_ok!(query.ingest(&second).await);

        let response = query.ask("Wat is de deadline?").await.unwrap();
        assert!(response.answer.contains("fietsen"));
        assert!(!response.answer.contains("maart"));
        assert_eq!(response.sources.len(), 1);
        assert_eq!(query.document().unwrap().name, "second.pdf");
    }

    #[tokio::test]
    async fn test_failed_ingest_leaves_no_index() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.pdf");
        let empty = dir.path().join("blank.pdf");
        write_pdf(&good, &["De deadline is in maart"]);
        write_pdf(&empty, &[" "]);
        let mut query = query_in(&dir, Arc::new(EchoChatModel));

        assert_ok!(query.ingest(&good).await);
        assert!(query.ingest(&empty).await.is_err());

        assert!(!query.has_document());
        assert!(!dir.path().join("chroma_db").exists());
        let response = query.ask("Wat is de deadline?").await.unwrap();
        assert_eq!(response.answer, MSG_NO_DOCUMENT);
    }

    #[tokio::test]
    async fn test_forget_removes_persisted_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bestek.pdf");
        write_pdf(&path, &["De deadline is in maart"]);
        let mut query = query_in(&dir, Arc::new(EchoChatModel));

        query.ingest(&path).await.unwrap();
        assert!(query.has_document());

        query.forget().unwrap();
        assert!(!query.has_document());
        assert!(query.document().is_none());
        assert!(!dir.path().join("chroma_db").exists());

        let response = query.ask("Wat is de deadline?").await.unwrap();
        assert_eq!(response.answer, MSG_NO_DOCUMENT);
    }

    #[tokio::test]
    async fn test_api_failure_surfaces_as_openai_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bestek.pdf");
        write_pdf(&path, &["De deadline is in maart"]);
        let mut query = query_in(&dir, Arc::new(FailingChatModel));

        query.ingest(&path).await.unwrap();
        let err = query.ask("Wat is de deadline?").await.unwrap_err();
        assert!(err.is_api_error());
    }

    #[test]
    fn test_backend_from_settings() {
        let mut settings = Settings::default();
        assert!(matches!(
            IndexBackend::from_settings(&settings).unwrap(),
            IndexBackend::Persistent { .. }
        ));

        settings.vector_store.provider = "memory".to_string();
        assert_eq!(IndexBackend::from_settings(&settings).unwrap(), IndexBackend::InMemory);

        settings.vector_store.provider = "chroma".to_string();
        assert!(IndexBackend::from_settings(&settings).is_err());
    }

    #[test]
    fn test_new_requires_api_key() {
        let settings = Settings::default();
        assert!(matches!(
            PdfQuery::new(&settings, "  "),
            Err(PdfChatError::Config(_))
        ));
    }
}
