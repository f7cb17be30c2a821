//! Run viewing subcommands
//!
//! Commands for listing runs, viewing a decision timeline, and exporting reports.

use clap::{Subcommand, ValueEnum};

#[derive(Subcommand)]
pub enum RunsCommands {
    /// List recorded runs, newest first
    List {
        /// Filter by status (pending, running, completed, failed)
        #[arg(long, short)]
        status: Option<String>,
    },
    /// View details and the decision timeline of a run
    View {
        /// Run ID (or partial ID prefix)
        id: String,
        /// Show full output (tool results and input/output payloads)
        #[arg(long, short)]
        full: bool,
    },
    /// Show fleet statistics across all runs
    Summary,
    /// Export a run report for analysis
    Export {
        /// Run ID (or partial ID prefix)
        id: String,
        /// Output format
        #[arg(long, short, value_enum, default_value = "markdown")]
        format: ExportFormat,
        /// Output to file instead of stdout
        #[arg(long, short)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// Markdown format (optimized for reading and analysis)
    Markdown,
    /// JSON format (machine-readable)
    Json,
}

impl From<ExportFormat> for crate::export::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Markdown => crate::export::ExportFormat::Markdown,
            ExportFormat::Json => crate::export::ExportFormat::Json,
        }
    }
}
