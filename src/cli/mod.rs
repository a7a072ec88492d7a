//! CLI module for pdfchat.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pdfchat - Ask questions about a PDF document
///
/// Upload a PDF in the web UI, or point the CLI at one, and get answers
/// grounded in its content.
#[derive(Parser, Debug)]
#[command(name = "pdfchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web UI
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Index a PDF and ask one question about it
    Ask {
        /// PDF file to index
        pdf: PathBuf,

        /// The question to ask
        question: String,

        /// Print the retrieved chunks after the answer
        #[arg(short, long)]
        sources: bool,
    },

    /// Summarize a PDF
    Summarize {
        /// PDF file to summarize
        pdf: PathBuf,
    },

    /// Query the web search endpoint
    Search {
        /// Search query
        query: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}
