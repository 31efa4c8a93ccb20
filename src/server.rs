use std::sync::Arc;

use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};

use crate::operation::OperationOutput;
use crate::registry::ToolRegistry;

/// MCP front end for a [`ToolRegistry`]. Holds no state besides the
/// registry; every call is dispatched independently.
#[derive(Clone)]
pub struct GithubOpsServer {
    registry: Arc<ToolRegistry>,
}

impl GithubOpsServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    fn to_result(output: OperationOutput) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(&output.into_value())
            .map_err(|e| McpError::internal_error(format!("JSON error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Run one tool call; the transport-independent half of `call_tool`.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = name, "Tool call");
        match self.registry.call(name, arguments).await {
            Ok(output) => Self::to_result(output),
            Err(err) => Err(err.to_mcp_error()),
        }
    }
}

impl ServerHandler for GithubOpsServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.registry.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(&request.name, request.arguments).await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "github-ops-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "GitHub operations on a single repository chosen at startup. \
                 list_issues, list_pull_requests, list_commits and list_tags browse the \
                 repository; read_issue_comments, read_pull_request_comments and \
                 list_pull_request_reviews read one numbered issue or PR; create_issue, \
                 create_pull_request, write_issue_comment and write_pull_request_comment \
                 create new content and are not idempotent."
                    .to_string(),
            ),
        }
    }
}
