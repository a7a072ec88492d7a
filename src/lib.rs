//! pdfchat - question answering over a single PDF
//!
//! Upload a PDF and ask questions about it in Dutch. The document is split
//! into chunks, embedded and indexed locally; answers are composed by a
//! hosted chat model from the chunks most similar to the question. A
//! separate summary action sends the whole document text to the model.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `pdf` - Page-by-page and whole-document text extraction
//! - `chunking` - Recursive character splitting
//! - `embedding` - Embedding generation
//! - `llm` - Chat completions
//! - `vector_store` - Vector index abstraction
//! - `rag` - Retrieval and answer generation
//! - `pdf_query` - The ingest/ask/forget pipeline
//! - `summary` - Whole-document summaries
//! - `web_search` - Web search client
//! - `server` - Web UI
//!
//! # Example
//!
//! ```rust,no_run
//! use pdfchat::config::Settings;
//! use pdfchat::pdf_query::PdfQuery;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let mut query = PdfQuery::new(&settings, &std::env::var("OPENAI_API_KEY")?)?;
//!
//!     query.ingest(Path::new("bestek.pdf")).await?;
//!     let response = query.ask("Wat is de deadline?").await?;
//!     println!("{}", response.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod openai;
pub mod pdf;
pub mod pdf_query;
pub mod rag;
pub mod server;
pub mod summary;
pub mod vector_store;
pub mod web_search;

#[cfg(test)]
mod test_support;

pub use error::{PdfChatError, Result};
