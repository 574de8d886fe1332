//! Generative-AI MCP server
//!
//! Exposes an AI provider (OpenAI or Gemini) as a set of uniform, typed
//! Model Context Protocol tools: chat, image generation, embeddings, speech,
//! token counting, vision and model listing.
//!
//! # Architecture
//!
//! - **Catalog**: per-provider model tables grouped by category, with one
//!   default per category
//! - **Schema**: JSON-Schema subset for tool inputs plus the request validator
//! - **Adapters**: one per provider, mapping validated arguments onto the
//!   backend's native API
//! - **Dispatcher**: routes `tools/call`, rejecting unknown tools and invalid
//!   arguments before any backend call
//! - **Server**: rmcp handler over stdio or streamable HTTP
//!
//! # Modules
//!
//! - [`catalog`]: model catalog
//! - [`schema`]: tool input schemas and validation
//! - [`llm`]: provider adapters and backend clients
//! - [`dispatch`]: tool dispatcher
//! - [`mcp`]: MCP registry and server handler
//! - [`normalized`]: uniform request/result envelopes

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::default_trait_access)]

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod llm;
pub mod mcp;
pub mod normalized;
pub mod schema;
pub mod server;
pub mod telemetry;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::dispatch::Dispatcher;
use crate::llm::gemini::HttpGeminiBackend;
use crate::llm::openai::HttpOpenAiBackend;
use crate::llm::{GeminiAdapter, OpenAiAdapter, Provider, ToolAdapter};
use crate::mcp::GenAiServer;

/// Adapter for the configured provider, talking to its real backend.
pub fn build_adapter(config: &AppConfig) -> Result<Arc<dyn ToolAdapter>, crate::config::ConfigError> {
    let catalog = Arc::new(config.build_catalog()?);
    let adapter: Arc<dyn ToolAdapter> = match config.provider() {
        Provider::OpenAI => Arc::new(OpenAiAdapter::new(
            Arc::new(HttpOpenAiBackend::new(config.base_url(), config.api_key())),
            catalog,
        )),
        Provider::Gemini => Arc::new(GeminiAdapter::new(
            Arc::new(HttpGeminiBackend::new(config.base_url(), config.api_key())),
            catalog,
        )),
    };
    Ok(adapter)
}

/// The MCP server for the configured provider.
pub fn build_server(config: &AppConfig) -> anyhow::Result<GenAiServer> {
    let adapter = build_adapter(config)?;
    let name = adapter.name().to_string();
    let dispatcher = Dispatcher::new(vec![adapter])?;
    Ok(GenAiServer::new(dispatcher, name))
}
