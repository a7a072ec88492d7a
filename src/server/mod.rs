//! Web UI server.
//!
//! Serves a single HTML page plus a small JSON API for uploading PDFs,
//! chatting about the indexed document and generating a summary. All session
//! state sits behind one async mutex, so user actions run one at a time.

mod handlers;
mod session;

pub use session::{ChatMessage, Session, UploadedFile};

use crate::pdf_query::PdfQuery;
use crate::summary::Summarizer;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
pub struct AppState {
    pub(crate) session: Mutex<Session>,
    pub(crate) summarizer: Summarizer,
    /// Directory uploads are staged in before ingestion.
    pub(crate) temp_dir: PathBuf,
}

impl AppState {
    pub fn new(query: PdfQuery, summarizer: Summarizer, temp_dir: PathBuf) -> Self {
        Self {
            session: Mutex::new(Session::new(query)),
            summarizer,
            temp_dir,
        }
    }
}

/// Build the router for the web UI and its API.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/upload", post(handlers::upload))
        .route("/api/ask", post(handlers::ask))
        .route("/api/messages", get(handlers::messages))
        .route(
            "/api/summary",
            get(handlers::get_summary).post(handlers::create_summary),
        )
        .route("/api/forget", post(handlers::forget))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: &str, app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
