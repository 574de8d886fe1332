//! rmcp server handler over the [`Dispatcher`].

use rmcp::{
    ErrorData, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};

use crate::dispatch::Dispatcher;
use crate::normalized::{ContentBlock, ToolRequest, ToolResult};

/// MCP server exposing one provider's tools.
#[derive(Debug, Clone)]
pub struct GenAiServer {
    dispatcher: Dispatcher,
    name: String,
}

impl GenAiServer {
    pub fn new(dispatcher: Dispatcher, name: impl Into<String>) -> Self {
        Self {
            dispatcher,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl From<ToolResult> for CallToolResult {
    fn from(result: ToolResult) -> Self {
        let is_error = result.is_error();
        let content: Vec<Content> = result
            .content
            .into_iter()
            .map(|block| match block {
                ContentBlock::Text { text } => Content::text(text),
            })
            .collect();

        if is_error {
            Self::error(content)
        } else {
            Self::success(content)
        }
    }
}

impl ServerHandler for GenAiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} exposes generative-AI capabilities as tools. Call tools/list for the \
                 available tools and their default models.",
                self.name
            )),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.dispatcher.mcp_tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = ToolRequest::new(request.name.to_string(), request.arguments.unwrap_or_default());
        Ok(self.dispatcher.call(request).await.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result_sets_flag() {
        let result: CallToolResult = ToolResult::unknown_tool("nope").into();
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn test_success_result_keeps_text() {
        let result: CallToolResult = ToolResult::text("done").into();
        assert_ne!(result.is_error, Some(true));
        assert_eq!(result.content.len(), 1);
        assert_eq!(result.content[0].as_text().map(|t| t.text.as_str()), Some("done"));
    }
}
