//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail on the first API call.

use crate::error::{PdfChatError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// The web UI needs an OpenAI key for every action.
    Serve,
    /// Asking questions requires an OpenAI key.
    Ask,
    /// Summaries require an OpenAI key.
    Summarize,
    /// Web search reads its own key and tolerates its absence.
    Search,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Serve | Operation::Ask | Operation::Summarize => {
            openai_api_key()?;
        }
        Operation::Search => {}
    }
    Ok(())
}

/// The configured OpenAI API key.
pub fn openai_api_key() -> Result<String> {
    validate_api_key(std::env::var("OPENAI_API_KEY").ok())
}

fn validate_api_key(value: Option<String>) -> Result<String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key),
        Some(_) => Err(PdfChatError::Config(
            "OPENAI_API_KEY is empty. Add it to .env or export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        None => Err(PdfChatError::Config(
            "OPENAI_API_KEY not set. Add it to .env or export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}
