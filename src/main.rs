//! Generative-AI MCP server.
//!
//! Entry point: load configuration, initialize logging, serve.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use dotenvy::dotenv;
use tracing::info;

use genai_mcp::config::{AppConfig, ConfigError};
use genai_mcp::{build_server, server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let config = match AppConfig::load() {
        Ok(c) => c,
        // --help / --version / usage errors are clap's to print
        Err(ConfigError::Cli(e)) => e.exit(),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing (M-LOG-STRUCTURED)
    telemetry::init(config.telemetry.json);

    info!(
        name: "config.loaded",
        provider = %config.provider(),
        transport = %config.server.transport,
        base_url = %config.base_url(),
        "Configuration loaded"
    );

    let server = build_server(&config)?;
    info!(
        name: "tools.registered",
        server = %server.name(),
        count = server.dispatcher().list_tools().len(),
        "Tools registered"
    );

    server::run(&config, server).await
}
