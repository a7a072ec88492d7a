//! RAG response generation.

use super::context::format_context_for_prompt;
use super::{ContextChunk, Retriever};
use crate::config::Prompts;
use crate::error::Result;
use crate::llm::ChatModel;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Answer returned when retrieval finds nothing.
pub const NO_RELEVANT_ANSWER: &str = "Geen relevante informatie gevonden in het document.";

/// RAG engine for question answering.
pub struct RagEngine {
    retriever: Retriever,
    chat: Arc<dyn ChatModel>,
    prompts: Prompts,
}

impl RagEngine {
    /// Create a new RAG engine.
    pub fn new(retriever: Retriever, chat: Arc<dyn ChatModel>) -> Self {
        Self {
            retriever,
            chat,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Render the QA prompt for a question and its context.
    pub fn build_prompt(&self, question: &str, chunks: &[ContextChunk]) -> String {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), format_context_for_prompt(chunks));

        self.prompts.render_with_custom(&self.prompts.qa.template, &vars)
    }

    /// Answer a question from the indexed document.
    #[instrument(skip(self, question), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<RagResponse> {
        let sources = self.retriever.retrieve(question).await?;

        if sources.is_empty() {
            warn!("No relevant documents found for the question");
            return Ok(RagResponse {
                answer: NO_RELEVANT_ANSWER.to_string(),
                sources,
            });
        }

        info!("Retrieved {} relevant document chunks", sources.len());

        let prompt = self.build_prompt(question, &sources);
        let answer = self.chat.complete(&prompt).await?;

        Ok(RagResponse {
            answer: answer.trim().to_string(),
            sources,
        })
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Chunks the answer was generated from.
    pub sources: Vec<ContextChunk>,
}

impl RagResponse {
    /// Whether retrieval found any context.
    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }

    /// Pages the answer drew on, in ascending order without duplicates.
    pub fn cited_pages(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self.sources.iter().map(|s| s.page).collect();
        pages.sort_unstable();
        pages.dedup();
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use crate::test_support::{EchoChatModel, KeywordEmbedder};
    use crate::vector_store::{Document, MemoryVectorStore, VectorStore};

    async fn engine_with(texts: &[(&str, u32)]) -> RagEngine {
        let embedder = Arc::new(KeywordEmbedder);
        let store = Arc::new(MemoryVectorStore::new());

        let mut docs = Vec::new();
        for (i, (text, page)) in texts.iter().enumerate() {
            let embedding = embedder.embed(text).await.unwrap();
            docs.push(Document::new("a.pdf".into(), *page, text.to_string(), embedding, i as i32));
        }
        store.upsert_batch(&docs).await.unwrap();

        RagEngine::new(Retriever::new(store, embedder), Arc::new(EchoChatModel))
    }

    #[tokio::test]
    async fn test_empty_index_returns_fixed_answer() {
        let engine = engine_with(&[]).await;
        let response = engine.ask("Wat is de deadline?").await.unwrap();

        assert_eq!(response.answer, NO_RELEVANT_ANSWER);
        assert!(!response.has_sources());
    }

    #[tokio::test]
    async fn test_prompt_carries_rules_context_and_question() {
        let engine = engine_with(&[("deadline is 1 maart", 2), ("budget is 10k", 5)]).await;
        let response = engine.ask("Wat is de deadline?").await.unwrap();

        assert!(response.answer.contains("Antwoord altijd in het Nederlands"));
        assert!(response.answer.contains("Vraag: Wat is de deadline?"));
        assert!(response.answer.contains("deadline is 1 maart"));
        assert_eq!(response.cited_pages(), vec![2, 5]);
    }
}
