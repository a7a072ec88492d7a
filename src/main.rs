//! pdfchat CLI entry point.

use anyhow::Result;
use clap::Parser;
use pdfchat::cli::{commands, Cli, Commands};
use pdfchat::config::Settings;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Rotated log files kept on disk.
const MAX_LOG_FILES: usize = 5;

fn init_logging(verbose: u8, settings: &Settings) -> Result<WorkerGuard> {
    let log_level = match verbose {
        0 => settings.general.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    let log_dir = settings.log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pdfchat.log")
        .max_log_files(MAX_LOG_FILES)
        .build(&log_dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("pdfchat={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv_override().ok();

    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    let _log_guard = init_logging(cli.verbose, &settings)?;

    std::fs::create_dir_all(settings.temp_dir())?;

    // Execute command
    match &cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Ask {
            pdf,
            question,
            sources,
        } => {
            commands::run_ask(pdf, question, *sources, settings).await?;
        }

        Commands::Summarize { pdf } => {
            commands::run_summarize(pdf, settings).await?;
        }

        Commands::Search { query } => {
            commands::run_search(query, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
