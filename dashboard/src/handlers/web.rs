//! Web command handler
//!
//! Start the HTTP API server.

use anyhow::Result;

use super::CommandContext;
use crate::web::{self, WebConfig};

/// Handle the `web` command
pub async fn run_web(
    ctx: &CommandContext,
    port: Option<u16>,
    host: Option<String>,
    open_browser: bool,
) -> Result<()> {
    let config = WebConfig {
        host: host.unwrap_or_else(|| ctx.file_config.web.host.clone()),
        port: port.unwrap_or(ctx.file_config.web.port),
        store: ctx.store(),
    };

    if open_browser {
        let url = format!("http://localhost:{}", config.port);
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        });
    }

    web::serve(config).await
}
