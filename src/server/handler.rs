//! MCP server handler
//!
//! Implements the MCP protocol handler for GitLab tools.

use crate::config::AppConfig;
use crate::error::mcp_mapper::{error_to_json, map_tool_error};
use crate::gitlab::GitLabClient;
use crate::tools::{ContentBlock, ToolContext, ToolOutput, ToolRegistry};
use rmcp::ErrorData as McpError;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, InitializeResult,
    ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, Tool,
    ToolsCapability,
};
use rmcp::service::{RequestContext, RoleServer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// GitLab gateway MCP handler
///
/// Cloned once per HTTP session; clones share the registry and client.
#[derive(Clone)]
pub struct GatewayHandler {
    name: String,
    version: String,
    read_only: bool,
    registry: Arc<ToolRegistry>,
    gitlab: Arc<GitLabClient>,
}

impl GatewayHandler {
    /// Create a new handler from configuration
    pub fn new(config: &AppConfig, gitlab: GitLabClient) -> Self {
        Self::new_with_shared(config, Arc::new(gitlab))
    }

    /// Create a new handler sharing an existing client
    pub fn new_with_shared(config: &AppConfig, gitlab: Arc<GitLabClient>) -> Self {
        let registry = ToolRegistry::with_all_tools();

        info!(
            tools = registry.len(),
            read_only = config.server.read_only,
            "Initialized GitLab gateway handler"
        );

        Self {
            name: config.server.name.clone(),
            version: config.server.version.clone(),
            read_only: config.server.read_only,
            registry: Arc::new(registry),
            gitlab,
        }
    }

    pub fn tool_count(&self) -> usize {
        self.registry.len()
    }

    fn create_context(&self, request_id: &str) -> ToolContext {
        ToolContext::new(self.gitlab.clone(), request_id).read_only(self.read_only)
    }

    fn to_mcp_result(output: ToolOutput) -> CallToolResult {
        let content = output
            .content
            .into_iter()
            .map(|block| match block {
                ContentBlock::Text { text } => Content::text(text),
            })
            .collect();

        CallToolResult {
            content,
            is_error: Some(output.is_error),
            meta: None,
            structured_content: None,
        }
    }

    /// Registry tools as MCP tool definitions
    ///
    /// In read-only mode write tools stay listed, with their description
    /// prefixed by "UNAVAILABLE: ".
    pub fn mcp_tools(&self) -> Vec<Tool> {
        self.registry
            .tools()
            .map(|tool| {
                let schema_value = serde_json::to_value(&tool.input_schema)
                    .unwrap_or_else(|_| serde_json::json!({}));

                let mut input_schema: Map<String, Value> = Map::new();
                input_schema.insert("type".to_string(), Value::String("object".to_string()));
                if let Some(props) = schema_value.get("properties") {
                    input_schema.insert("properties".to_string(), props.clone());
                }
                if let Some(required) = schema_value.get("required") {
                    input_schema.insert("required".to_string(), required.clone());
                }

                let description = if self.read_only && !tool.operation.is_read_only() {
                    format!("UNAVAILABLE: {}", tool.description)
                } else {
                    tool.description.to_string()
                };

                Tool {
                    name: Cow::Borrowed(tool.name),
                    description: Some(Cow::Owned(description)),
                    input_schema: Arc::new(input_schema),
                    annotations: None,
                    icons: None,
                    meta: None,
                    output_schema: None,
                    title: None,
                }
            })
            .collect()
    }

    /// Execute a tool call
    ///
    /// Unknown tools and malformed arguments are protocol errors; anything
    /// that fails while running the tool becomes an error result.
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, McpError> {
        let request_id = format!("{:x}", rand::random::<u64>());
        let ctx = self.create_context(&request_id);

        let args = arguments
            .map(Value::Object)
            .unwrap_or_else(|| serde_json::json!({}));

        match self.registry.execute(name, &ctx, args).await {
            Ok(output) => Ok(Self::to_mcp_result(output)),
            Err(e) if e.is_protocol_error() => Err(map_tool_error(&e)),
            Err(e) => {
                error!(error = %e, request_id = %request_id, "Tool execution failed");
                Ok(CallToolResult {
                    content: vec![Content::text(error_to_json(&e).to_string())],
                    is_error: Some(true),
                    meta: None,
                    structured_content: None,
                })
            }
        }
    }
}

impl ServerHandler for GatewayHandler {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "GitLab gateway - search projects, read and write repository files, open merge requests and issues, and comment on merge request diffs"
                    .to_string(),
            ),
        }
    }

    #[instrument(skip(self, _context))]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        debug!("Listing tools");
        async move {
            Ok(ListToolsResult {
                tools: self.mcp_tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        debug!(?request.arguments, "Calling tool");
        async move { self.execute_tool(&request.name, request.arguments).await }
    }
}
