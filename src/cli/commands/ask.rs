//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pdf_query::PdfQuery;
use anyhow::Result;
use std::path::Path;

/// Run the ask command.
pub async fn run_ask(pdf: &Path, question: &str, show_sources: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let api_key = preflight::openai_api_key()?;
    let mut query = PdfQuery::new(&settings, &api_key)?;

    let spinner = Output::spinner(&format!("Indexing {}...", pdf.display()));
    let document = match query.ingest(pdf).await {
        Ok(document) => document,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to index {}: {}", pdf.display(), e));
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();
    Output::success(&format!(
        "Indexed {} ({} pages, {} chunks)",
        document.name, document.pages, document.chunks
    ));

    let spinner = Output::spinner("Bezig met denken...");
    let response = query.ask(question).await;
    spinner.finish_and_clear();

    match response {
        Ok(response) => {
            println!("\n{}\n", response.answer);

            if show_sources && response.has_sources() {
                Output::header("Sources");
                for source in &response.sources {
                    Output::source(source.page, source.score, &source.content);
                }
            } else if response.has_sources() {
                let pages: Vec<String> = response
                    .cited_pages()
                    .iter()
                    .map(|p| p.to_string())
                    .collect();
                Output::kv("Pages", &pages.join(", "));
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
