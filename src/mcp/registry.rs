use crate::schema::SchemaNode;
use rmcp::model::Tool;
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};

/// A tool as advertised in `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: SchemaNode,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: SchemaNode,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Convert into the rmcp tool model used on the wire.
    pub fn to_mcp_tool(&self) -> Tool {
        Tool::new(
            self.name.clone(),
            self.description.clone(),
            Arc::new(self.input_schema.to_json_object()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),
}

/// Ordered, immutable set of tool definitions with unique names.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    // tool name -> position in `tools`
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new(definitions: Vec<ToolDefinition>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (pos, def) in definitions.iter().enumerate() {
            if index.insert(def.name.clone(), pos).is_some() {
                return Err(RegistryError::DuplicateTool(def.name.clone()));
            }
        }
        Ok(Self {
            tools: definitions,
            index,
        })
    }

    /// All definitions in registration order.
    pub fn list(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&pos| &self.tools[pos])
    }

    /// Listing in the rmcp wire model.
    pub fn mcp_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolDefinition::to_mcp_tool).collect()
    }
}
