//! Tool dispatch.
//!
//! The [`Dispatcher`] owns the merged tool registry of every configured
//! adapter and routes `tools/call` requests: unknown names and invalid
//! arguments are rejected before any backend is touched, everything else is
//! handed to the owning adapter with defaults already filled in.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use rmcp::model::Tool;
use tracing::{debug, info};

use crate::llm::ToolAdapter;
use crate::mcp::registry::{RegistryError, ToolDefinition, ToolRegistry};
use crate::normalized::{ToolRequest, ToolResult};
use crate::schema::validate;

/// Routes tool calls to the adapter that owns them.
///
/// Immutable after construction and cheap to clone.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    routes: Arc<HashMap<String, Arc<dyn ToolAdapter>>>,
}

impl Dispatcher {
    /// Build the registry from every adapter's tool table.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTool`] if two adapters (or one
    /// adapter twice) declare the same tool name.
    pub fn new(adapters: Vec<Arc<dyn ToolAdapter>>) -> Result<Self, RegistryError> {
        let mut definitions = Vec::new();
        let mut routes = HashMap::new();

        for adapter in adapters {
            for def in adapter.tool_definitions() {
                routes.insert(def.name.clone(), Arc::clone(&adapter));
                definitions.push(def);
            }
        }

        let registry = ToolRegistry::new(definitions)?;
        for def in registry.list() {
            debug!(name: "tool.registered", tool = %def.name, "Tool registered");
        }

        Ok(Self {
            registry: Arc::new(registry),
            routes: Arc::new(routes),
        })
    }

    /// Tool definitions in registration order.
    pub fn list_tools(&self) -> &[ToolDefinition] {
        self.registry.list()
    }

    /// Tool definitions in MCP wire form.
    pub fn mcp_tools(&self) -> Vec<Tool> {
        self.registry.mcp_tools()
    }

    /// Handle one tool call. Never fails; every problem is an error result.
    pub async fn call(&self, request: ToolRequest) -> ToolResult {
        let started = Instant::now();
        let tool = request.tool_name.as_str();
        let result = self.route(tool, request.arguments).await;

        info!(
            name: "tool.call",
            tool = %tool,
            is_error = result.is_error(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tool call finished"
        );
        result
    }

    async fn route(&self, tool: &str, arguments: serde_json::Map<String, serde_json::Value>) -> ToolResult {
        let (Some(def), Some(adapter)) = (self.registry.get(tool), self.routes.get(tool)) else {
            return ToolResult::unknown_tool(tool);
        };

        match validate(&def.input_schema, &arguments) {
            Ok(effective) => adapter.invoke(tool, effective).await,
            Err(e) => ToolResult::error(format!("Invalid arguments for tool '{tool}': {e}")),
        }
    }
}
