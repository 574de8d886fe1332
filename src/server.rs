//! Transports: stdio and streamable HTTP.

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use rmcp::{
    ServiceExt,
    transport::streamable_http_server::{
        StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
    },
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{AppConfig, Transport};
use crate::mcp::GenAiServer;

/// Run the MCP server on the configured transport until the client
/// disconnects (stdio) or the process is stopped (HTTP).
pub async fn run(config: &AppConfig, server: GenAiServer) -> anyhow::Result<()> {
    match config.server.transport {
        Transport::Stdio => serve_stdio(server).await,
        Transport::Http => {
            let addr = format!("{}:{}", config.server.host, config.effective_port());
            serve_http(&addr, server).await
        }
    }
}

async fn serve_stdio(server: GenAiServer) -> anyhow::Result<()> {
    let name = server.name().to_string();
    let running = server.serve(rmcp::transport::stdio()).await?;

    info!(
        name: "server.started",
        server = %name,
        transport = "stdio",
        "MCP server running on stdio"
    );

    running.waiting().await?;
    Ok(())
}

async fn serve_http(addr: &str, server: GenAiServer) -> anyhow::Result<()> {
    let name = server.name().to_string();
    let app = router(server);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        name: "server.started",
        server = %name,
        transport = "http",
        address = %addr,
        "MCP server running on HTTP (health: /health, endpoint: /mcp)"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// HTTP surface: `GET /health` plus the streamable-HTTP MCP endpoint at `/mcp`.
pub fn router(server: GenAiServer) -> Router {
    let name: Arc<str> = Arc::from(server.name());
    let mcp_service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .route("/health", get(health))
        .with_state(name)
        .nest_service("/mcp", mcp_service)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// GET /health
async fn health(State(name): State<Arc<str>>) -> Json<Value> {
    Json(json!({ "status": "ok", "server": &*name }))
}
