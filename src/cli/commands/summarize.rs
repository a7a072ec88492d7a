//! Summarize command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::summary::Summarizer;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the summarize command.
pub async fn run_summarize(pdf: &Path, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Summarize) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let bytes = tokio::fs::read(pdf)
        .await
        .with_context(|| format!("Failed to read {}", pdf.display()))?;

    let api_key = preflight::openai_api_key()?;
    let summarizer = Summarizer::from_settings(&settings, &api_key)?;

    let spinner = Output::spinner("Samenvatting genereren...");
    let result = summarizer.summarize_pdf(&bytes).await;
    spinner.finish_and_clear();

    match result {
        Ok(summary) => {
            Output::header("Samenvatting");
            println!("\n{}\n", summary);
        }
        Err(e) => {
            Output::error(&format!("Failed to summarize: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
