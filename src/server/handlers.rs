//! HTTP handlers for the web UI.

use super::session::ChatMessage;
use super::AppState;
use crate::error::{Action, PdfChatError, MSG_NO_DOCUMENT, MSG_NO_RELEVANT, MSG_UPLOAD_FAILED};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;
use tracing::{error, info, warn};

const INDEX_HTML: &str = include_str!("index.html");
const MSG_BLANK_QUESTION: &str = "Stel eerst een vraag.";

// === Request/Response Types ===

#[derive(Serialize)]
struct UploadResponse {
    files: Vec<UploadOutcome>,
}

#[derive(Serialize)]
struct UploadOutcome {
    name: String,
    success: bool,
    /// Whether this file is the one answering questions after the request.
    indexed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pages: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chunks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct AskRequest {
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<&'static str>,
    sources: Vec<SourceInfo>,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct SourceInfo {
    page: u32,
    score: f32,
}

#[derive(Serialize)]
struct MessagesResponse {
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct SummaryResponse {
    summary: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Status code for a failed action.
fn status_for(err: &PdfChatError) -> StatusCode {
    if err.is_api_error() {
        return StatusCode::BAD_GATEWAY;
    }
    match err {
        PdfChatError::EmptyFile(_)
        | PdfChatError::PdfRead(_)
        | PdfChatError::EmptyExtraction
        | PdfChatError::EmptySplit => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// === Handlers ===

pub(super) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(super) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub(super) async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let mut session = state.session.lock().await;
    let mut outcomes: Vec<UploadOutcome> = Vec::new();
    let mut indexed: Option<usize> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                error!("Error reading upload: {}", e);
                return error_response(StatusCode::BAD_REQUEST, MSG_UPLOAD_FAILED);
            }
        };

        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                error!("Error reading upload {}: {}", name, e);
                return error_response(StatusCode::BAD_REQUEST, MSG_UPLOAD_FAILED);
            }
        };

        info!("Processing file: {}", name);
        match ingest_upload(&mut session.query, &state.temp_dir, &bytes).await {
            Ok(document) => {
                info!("Successfully ingested file: {}", name);
                session.remember_upload(&name, bytes);
                indexed = Some(outcomes.len());
                outcomes.push(UploadOutcome {
                    name,
                    success: true,
                    indexed: false,
                    pages: Some(document.pages),
                    chunks: Some(document.chunks),
                    error: None,
                });
            }
            Err(e) => {
                error!("Error processing file {}: {}", name, e);
                // A failure after the old index was dropped leaves nothing indexed.
                if !session.query.has_document() {
                    session.clear_upload();
                    indexed = None;
                }
                outcomes.push(UploadOutcome {
                    name,
                    success: false,
                    indexed: false,
                    pages: None,
                    chunks: None,
                    error: Some(e.user_message(Action::Upload).to_string()),
                });
            }
        }
    }

    if outcomes.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, MSG_UPLOAD_FAILED);
    }
    if let Some(i) = indexed {
        outcomes[i].indexed = true;
    }

    let status = if outcomes.iter().all(|o| o.success) {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(UploadResponse { files: outcomes })).into_response()
}

/// Write an upload to a scratch `.pdf` file and ingest it.
///
/// The scratch file is removed when it goes out of scope, on every path.
async fn ingest_upload(
    query: &mut crate::pdf_query::PdfQuery,
    temp_dir: &std::path::Path,
    bytes: &[u8],
) -> crate::error::Result<crate::pdf_query::IndexedDocument> {
    let mut temp = tempfile::Builder::new()
        .prefix("pdfchat-")
        .suffix(".pdf")
        .tempfile_in(temp_dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;

    query.ingest(temp.path()).await
}

pub(super) async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Response {
    let question = req.question.trim();
    if question.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, MSG_BLANK_QUESTION);
    }

    let mut session = state.session.lock().await;
    if !session.query.has_document() {
        return error_response(StatusCode::CONFLICT, MSG_NO_DOCUMENT);
    }

    match session.query.ask(question).await {
        Ok(response) => {
            let warning = if response.has_sources() {
                None
            } else {
                warn!("No relevant content for question");
                Some(MSG_NO_RELEVANT)
            };

            if !response.answer.is_empty() {
                session.record_exchange(question, &response.answer);
            }

            Json(AskResponse {
                sources: response
                    .sources
                    .iter()
                    .map(|s| SourceInfo {
                        page: s.page,
                        score: s.score,
                    })
                    .collect(),
                answer: response.answer,
                warning,
                messages: session.messages().to_vec(),
            })
            .into_response()
        }
        Err(e) => {
            error!("Error in chat: {}", e);
            error_response(status_for(&e), e.user_message(Action::Ask))
        }
    }
}

pub(super) async fn messages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(MessagesResponse {
        messages: session.messages().to_vec(),
    })
}

pub(super) async fn create_summary(State(state): State<Arc<AppState>>) -> Response {
    let mut session = state.session.lock().await;
    let bytes = session
        .last_upload()
        .map(|upload| upload.bytes.clone())
        .unwrap_or_default();

    match state.summarizer.summarize_pdf(&bytes).await {
        Ok(summary) => {
            session.set_summary(summary.clone());
            Json(SummaryResponse {
                summary: Some(summary),
            })
            .into_response()
        }
        Err(e) => {
            error!("Error generating summary: {}", e);
            error_response(status_for(&e), e.user_message(Action::Summary))
        }
    }
}

pub(super) async fn get_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(SummaryResponse {
        summary: session.summary().map(str::to_string),
    })
}

pub(super) async fn forget(State(state): State<Arc<AppState>>) -> Response {
    let mut session = state.session.lock().await;
    match session.forget_document() {
        Ok(()) => Json(serde_json::json!({ "status": "ok" })).into_response(),
        Err(e) => {
            error!("Error clearing document: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.user_message(Action::Upload))
        }
    }
}
