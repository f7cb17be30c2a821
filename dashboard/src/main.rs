use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hive_dashboard::cli::{Cli, Commands};
use hive_dashboard::config::DashboardFileConfig;
use hive_dashboard::handlers::{self, CommandContext};

/// Initialize tracing with the given verbosity level
///
/// - 0: warn (default)
/// - 1: info (-v)
/// - 2: debug (-vv)
/// - 3+: trace (-vvv)
///
/// `RUST_LOG` overrides the level; `LOG_FORMAT=json` switches to JSON output.
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI first to get verbosity before initializing tracing
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file_config = DashboardFileConfig::load()?;
    let ctx = CommandContext::new(cli.storage_root, cli.verbose, file_config)?;

    match cli.command {
        Commands::Runs { command } => handlers::run_runs_command(&ctx, command).await,
        #[cfg(feature = "web")]
        Commands::Web { port, host, open } => handlers::run_web(&ctx, port, host, open).await,
    }
}
