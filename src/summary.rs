//! Whole-document summaries.
//!
//! Unlike question answering, summaries skip retrieval entirely: the full
//! text of the PDF is extracted in one pass and sent to the summary model.

use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::llm::{ChatModel, OpenAIChatModel};
use crate::openai::create_client_from_settings;
use crate::pdf::extract_full_text;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Generates a tender-bid summary of a PDF.
pub struct Summarizer {
    chat: Arc<dyn ChatModel>,
    prompts: Prompts,
}

impl Summarizer {
    pub fn new(chat: Arc<dyn ChatModel>) -> Self {
        Self {
            chat,
            prompts: Prompts::default(),
        }
    }

    /// Build a summarizer backed by the configured summary model.
    pub fn from_settings(settings: &Settings, api_key: &str) -> Result<Self> {
        let client = create_client_from_settings(api_key, &settings.openai)?;
        let chat = Arc::new(OpenAIChatModel::for_summaries(client, &settings.summary));
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        Ok(Self::new(chat).with_prompts(prompts))
    }

    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Render the summary prompt around the document text.
    pub fn build_prompt(&self, document: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("document".to_string(), document.to_string());
        self.prompts
            .render_with_custom(&self.prompts.summary.template, &vars)
    }

    /// Summarize a PDF given its raw bytes.
    ///
    /// Empty input is summarized as an empty document rather than rejected.
    #[instrument(skip(self, pdf), fields(bytes = pdf.len()))]
    pub async fn summarize_pdf(&self, pdf: &[u8]) -> Result<String> {
        let text = if pdf.is_empty() {
            warn!("No document available, summarizing empty text");
            String::new()
        } else {
            let owned = pdf.to_vec();
            tokio::task::spawn_blocking(move || extract_full_text(&owned))
                .await
                .map_err(|e| {
                    crate::error::PdfChatError::PdfRead(format!("PDF loader task failed: {}", e))
                })??
        };

        self.summarize_text(&text).await
    }

    /// Summarize already-extracted text.
    pub async fn summarize_text(&self, text: &str) -> Result<String> {
        info!(
            "Requesting summary of {} characters from {}",
            text.len(),
            self.chat.model()
        );
        let summary = self.chat.complete(&self.build_prompt(text)).await?;
        Ok(summary.trim().to_string())
    }
}
