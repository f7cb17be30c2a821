//! CLI argument definitions
//!
//! Contains the main CLI struct and Commands enum for clap parsing.

use clap::{ArgAction, Parser, Subcommand};

use super::runs_args::RunsCommands;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Read-only dashboard for agent run logs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding run JSON files (default: from .dashboard.toml or ~/.hive/storage/runs)
    #[arg(long, env = "HIVE_RUNS_DIR", global = true)]
    pub storage_root: Option<String>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and export recorded runs
    Runs {
        #[command(subcommand)]
        command: RunsCommands,
    },

    /// Start the HTTP API server
    #[cfg(feature = "web")]
    Web {
        /// Port to listen on (default: from .dashboard.toml or 3001)
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind (default: from .dashboard.toml or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
        /// Open browser after starting
        #[arg(long)]
        open: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runs_view() {
        let cli = Cli::parse_from(["dashboard", "--storage-root", "/tmp/runs", "runs", "view", "abc", "--full"]);
        assert_eq!(cli.storage_root.as_deref(), Some("/tmp/runs"));
        match cli.command {
            Commands::Runs {
                command: RunsCommands::View { id, full },
            } => {
                assert_eq!(id, "abc");
                assert!(full);
            }
            _ => panic!("expected runs view"),
        }
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::parse_from(["dashboard", "-vv", "runs", "summary"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
