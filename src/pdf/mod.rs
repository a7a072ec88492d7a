//! PDF text extraction.
//!
//! Two paths exist: a page-by-page loader that feeds the index, and a
//! whole-document extractor working from memory that feeds the summary.

use crate::error::{PdfChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Text of a single PDF page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// File name the page was loaded from.
    pub source: String,
    /// 1-based page number.
    pub number: u32,
    /// Extracted text.
    pub text: String,
}

impl Page {
    /// Whether the page carries any non-whitespace text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Load a PDF file as one `Page` per page.
///
/// pdf-extract can panic on malformed input, so the call is isolated with
/// `catch_unwind` and a panic is reported as a read error.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_pages(path: &Path) -> Result<Vec<Page>> {
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_by_pages(path)
    }));

    let texts = match result {
        Ok(Ok(texts)) => texts,
        Ok(Err(e)) => {
            warn!("Error loading PDF: {}", e);
            return Err(PdfChatError::PdfRead(e.to_string()));
        }
        Err(_) => {
            warn!("PDF parser panicked while reading {}", source);
            return Err(PdfChatError::PdfRead(
                "PDF parser failed on malformed input".to_string(),
            ));
        }
    };

    let pages: Vec<Page> = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| Page {
            source: source.clone(),
            number: i as u32 + 1,
            text,
        })
        .collect();

    info!("Loaded {} pages from {}", pages.len(), source);
    Ok(pages)
}

/// Extract the full text of an in-memory PDF as one string.
pub fn extract_full_text(bytes: &[u8]) -> Result<String> {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match result {
        Ok(Ok(text)) => {
            debug!("Extracted {} characters of text", text.len());
            Ok(text)
        }
        Ok(Err(e)) => Err(PdfChatError::PdfRead(e.to_string())),
        Err(_) => Err(PdfChatError::PdfRead(
            "PDF parser failed on malformed input".to_string(),
        )),
    }
}
