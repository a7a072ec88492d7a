//! Search command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::web_search::WebSearch;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, settings: Settings) -> Result<()> {
    let search = WebSearch::from_settings(&settings.search)?;

    let spinner = Output::spinner("Searching the web...");
    let result = search.search(query).await;
    spinner.finish_and_clear();

    match result {
        Ok(answer) => {
            println!("\n{}\n", answer.answer);
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
