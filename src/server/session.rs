//! Per-process chat session.

use crate::pdf_query::PdfQuery;
use serde::Serialize;

/// One line of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub text: String,
    pub is_user: bool,
}

/// The last PDF that was ingested successfully.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Everything a user has done since the server started.
pub struct Session {
    pub query: PdfQuery,
    messages: Vec<ChatMessage>,
    last_upload: Option<UploadedFile>,
    summary: Option<String>,
}

impl Session {
    pub fn new(query: PdfQuery) -> Self {
        Self {
            query,
            messages: Vec::new(),
            last_upload: None,
            summary: None,
        }
    }

    /// Record a question and the answer it got.
    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        self.messages.push(ChatMessage {
            text: question.to_string(),
            is_user: true,
        });
        self.messages.push(ChatMessage {
            text: answer.to_string(),
            is_user: false,
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn remember_upload(&mut self, name: &str, bytes: Vec<u8>) {
        self.last_upload = Some(UploadedFile {
            name: name.to_string(),
            bytes,
        });
    }

    pub fn last_upload(&self) -> Option<&UploadedFile> {
        self.last_upload.as_ref()
    }

    pub fn clear_upload(&mut self) {
        self.last_upload = None;
    }

    pub fn set_summary(&mut self, summary: String) {
        self.summary = Some(summary);
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Forget the indexed document and the upload it came from.
    pub fn forget_document(&mut self) -> crate::error::Result<()> {
        self.clear_upload();
        self.query.forget()
    }
}
