//! Configuration module for pdfchat.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts, SummaryPrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, OpenAISettings, PromptSettings,
    RagSettings, SearchSettings, ServerSettings, Settings, SummarySettings, VectorStoreSettings,
};
