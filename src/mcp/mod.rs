//! Model Context Protocol (MCP) server surface.
//!
//! - [`registry`]: tool definitions and the ordered registry behind `tools/list`
//! - [`handler`]: the rmcp `ServerHandler` that answers `initialize`,
//!   `tools/list` and `tools/call` by delegating to the dispatcher
//!
//! Tool names are flat (`chat_completion`, `embed_content`); one server
//! process exposes one provider, so names never need a namespace.

pub mod handler;
pub mod registry;

pub use handler::GenAiServer;
