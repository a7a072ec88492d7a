//! Web UI server command.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pdf_query::PdfQuery;
use crate::server::{self, AppState};
use crate::summary::Summarizer;
use std::sync::Arc;

/// Run the web UI server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let api_key = preflight::openai_api_key()?;
    let query = PdfQuery::new(&settings, &api_key)?;
    let summarizer = Summarizer::from_settings(&settings, &api_key)?;

    let state = Arc::new(AppState::new(query, summarizer, settings.temp_dir()));
    let app = server::router(state, settings.server.max_upload_bytes);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);

    Output::header("PDF Chat");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Web UI", "GET  /");
    Output::kv("Upload", "POST /api/upload");
    Output::kv("Ask", "POST /api/ask");
    Output::kv("Messages", "GET  /api/messages");
    Output::kv("Summary", "GET|POST /api/summary");
    Output::kv("Forget", "POST /api/forget");
    Output::kv("Health", "GET  /health");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    server::serve(&addr, app).await?;

    Ok(())
}
