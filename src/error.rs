//! Error types for pdfchat.

use thiserror::Error;

/// Library-level error type for pdfchat operations.
#[derive(Error, Debug)]
pub enum PdfChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File is empty: {0}")]
    EmptyFile(String),

    #[error("Could not read PDF file: {0}")]
    PdfRead(String),

    #[error("No content could be extracted from the PDF")]
    EmptyExtraction,

    #[error("Document splitting resulted in no chunks")]
    EmptySplit,

    #[error("Error processing document content: {0}")]
    Processing(Box<PdfChatError>),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("RAG error: {0}")]
    Rag(String),

    #[error("Web search error: {0}")]
    Search(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),
}

/// The user action an error surfaced from, used to pick the fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Upload,
    Ask,
    Summary,
}

pub const MSG_NO_DOCUMENT: &str = "Upload eerst een document.";
pub const MSG_API: &str =
    "Er is een probleem met de OpenAI API verbinding. Controleer je API sleutel.";
pub const MSG_EMPTY_FILE: &str = "Het geüploade bestand is leeg. Upload een geldig PDF bestand.";
pub const MSG_NO_RELEVANT: &str =
    "Geen relevante informatie gevonden. Probeer je vraag anders te formuleren.";
pub const MSG_UPLOAD_FAILED: &str =
    "Er is een fout opgetreden bij het verwerken van het bestand. Probeer het opnieuw.";
pub const MSG_ASK_FAILED: &str =
    "Er is een fout opgetreden bij het verwerken van je vraag. Probeer het opnieuw.";
pub const MSG_SUMMARY_FAILED: &str =
    "Er is een fout opgetreden bij het maken van de samenvatting. Probeer het opnieuw.";

impl PdfChatError {
    /// Wrap an error raised while embedding or indexing chunks.
    pub fn processing(err: PdfChatError) -> Self {
        PdfChatError::Processing(Box::new(err))
    }

    /// Whether this error originates from the hosted OpenAI API.
    pub fn is_api_error(&self) -> bool {
        match self {
            PdfChatError::OpenAI(_) => true,
            PdfChatError::Processing(inner) => inner.is_api_error(),
            _ => false,
        }
    }

    /// Dutch message shown in the web UI for this error.
    pub fn user_message(&self, action: Action) -> &'static str {
        if self.is_api_error() {
            return MSG_API;
        }

        match (self, action) {
            (PdfChatError::EmptyFile(_), _) => MSG_EMPTY_FILE,
            (_, Action::Upload) => MSG_UPLOAD_FAILED,
            (_, Action::Ask) => MSG_ASK_FAILED,
            (_, Action::Summary) => MSG_SUMMARY_FAILED,
        }
    }
}

/// Result type alias for pdfchat operations.
pub type Result<T> = std::result::Result<T, PdfChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_errors_map_to_api_message() {
        let err = PdfChatError::OpenAI("401 Unauthorized".to_string());
        assert_eq!(err.user_message(Action::Ask), MSG_API);
        assert_eq!(err.user_message(Action::Upload), MSG_API);

        let wrapped = PdfChatError::processing(PdfChatError::OpenAI("timeout".to_string()));
        assert_eq!(wrapped.user_message(Action::Upload), MSG_API);
    }

    #[test]
    fn test_empty_file_message() {
        let err = PdfChatError::EmptyFile("upload.pdf".to_string());
        assert_eq!(err.user_message(Action::Upload), MSG_EMPTY_FILE);
    }

    #[test]
    fn test_generic_messages_depend_on_action() {
        let err = PdfChatError::PdfRead("bad xref".to_string());
        assert_eq!(err.user_message(Action::Upload), MSG_UPLOAD_FAILED);
        assert_eq!(err.user_message(Action::Ask), MSG_ASK_FAILED);
        assert_eq!(err.user_message(Action::Summary), MSG_SUMMARY_FAILED);
    }
}
