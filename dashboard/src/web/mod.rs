//! Web server module
//!
//! Serves the run store as a read-only JSON API for the dashboard frontend.

pub mod runs;
pub mod state;

use anyhow::{Context, Result};
use axum::{response::Html, routing::get, Router};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::store::RunStore;
use state::AppState;

/// Configuration for the web server
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    pub store: RunStore,
}

/// Start the web server
pub async fn serve(config: WebConfig) -> Result<()> {
    if config.store.is_available() {
        tracing::info!("Serving runs from {}", config.store.root().display());
    } else {
        tracing::warn!(
            "Storage directory not found: {} (serving an empty run list)",
            config.store.root().display()
        );
    }

    let app = create_router(AppState::new(config.store));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    tracing::info!("Starting web server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Runs
        .route("/runs", get(runs::list_runs))
        .route("/runs/{id}", get(runs::get_run))
        .route("/runs/{id}/timeline", get(runs::get_run_timeline))
        .route("/runs/{id}/export", get(runs::export_run))
        // Aggregates
        .route("/stats", get(runs::get_stats))
        // Health
        .route("/health", get(runs::health_check));

    Router::new()
        .nest("/api", api_routes)
        .fallback(index)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Landing page listing the API
async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Hive Run Dashboard</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
            max-width: 600px;
            margin: 100px auto;
            padding: 20px;
            background: #0f172a;
            color: #e2e8f0;
        }
        h1 { color: #8b5cf6; }
        code {
            background: #1e293b;
            padding: 2px 8px;
            border-radius: 4px;
        }
    </style>
</head>
<body>
    <h1>Hive Run Dashboard</h1>
    <p>Read-only API over recorded agent runs.</p>
    <h2>API Endpoints</h2>
    <ul>
        <li><code>GET /api/health</code> - Health check</li>
        <li><code>GET /api/runs</code> - List runs, newest first (<code>?status=</code>)</li>
        <li><code>GET /api/runs/{id}</code> - Full run record</li>
        <li><code>GET /api/runs/{id}/timeline</code> - Decision timeline</li>
        <li><code>GET /api/runs/{id}/export</code> - Report (<code>?format=markdown|json</code>)</li>
        <li><code>GET /api/stats</code> - Fleet statistics</li>
    </ul>
</body>
</html>"#,
    )
}
