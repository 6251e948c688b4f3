//! MCP error code mapping.
//!
//! Maps application errors to MCP protocol errors with appropriate JSON-RPC error codes.
//!
//! # Strategy
//! - Protocol-level errors (tool not found, invalid arguments) → `Err(McpError)`
//! - Tool execution errors → `Ok(CallToolResult { is_error: true })` carrying [`error_to_json`]
//!
//! This distinction allows MCP clients to differentiate between problems with
//! the request itself and failures reported by GitLab while running the tool.

use rmcp::ErrorData as McpError;
use rmcp::model::ErrorCode;
use serde_json::{Value, json};
use std::borrow::Cow;

use super::{AccessDeniedError, GitLabError, ToolError};

/// Maps a `ToolError` to an MCP protocol error.
pub fn map_tool_error(error: &ToolError) -> McpError {
    match error {
        ToolError::NotFound(name) => McpError {
            code: ErrorCode::METHOD_NOT_FOUND,
            message: Cow::Owned(format!("Tool '{}' not found", name)),
            data: Some(json!({
                "tool": name,
                "error_type": "ToolNotFound"
            })),
        },

        ToolError::InvalidArguments(msg) => McpError {
            code: ErrorCode::INVALID_PARAMS,
            message: Cow::Owned(msg.clone()),
            data: Some(json!({
                "error_type": "InvalidArguments"
            })),
        },

        ToolError::Serialization(e) => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("Failed to serialize tool result: {}", e)),
            data: Some(json!({
                "error_type": "SerializationError"
            })),
        },

        ToolError::GitLab(gitlab_err) => map_gitlab_error(gitlab_err),

        ToolError::AccessDenied(access_err) => map_access_denied_error(access_err),
    }
}

/// Maps a `GitLabError` to an MCP protocol error.
pub fn map_gitlab_error(error: &GitLabError) -> McpError {
    match error {
        GitLabError::Unauthorized => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Borrowed("GitLab authentication failed"),
            data: Some(json!({
                "error_type": "Unauthorized",
                "hint": "Check that GITLAB_TOKEN is valid, not expired and has the api scope"
            })),
        },

        GitLabError::Forbidden { message } => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("Forbidden: {}", message)),
            data: Some(json!({
                "error_type": "Forbidden"
            })),
        },

        GitLabError::NotFound { resource } => McpError {
            code: ErrorCode::RESOURCE_NOT_FOUND,
            message: Cow::Owned(format!("Resource not found: {}", resource)),
            data: Some(json!({
                "error_type": "NotFound",
                "resource": resource
            })),
        },

        GitLabError::Api { status, message } => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("GitLab API error (HTTP {}): {}", status, message)),
            data: Some(json!({
                "error_type": "ApiError",
                "status": status
            })),
        },

        GitLabError::Request(e) => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("HTTP request failed: {}", e)),
            data: Some(json!({
                "error_type": "RequestError"
            })),
        },

        GitLabError::InvalidResponse(msg) => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("Invalid response from GitLab: {}", msg)),
            data: Some(json!({
                "error_type": "InvalidResponse"
            })),
        },
    }
}

/// Maps an `AccessDeniedError` to an MCP protocol error.
pub fn map_access_denied_error(error: &AccessDeniedError) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::Owned(error.to_string()),
        data: Some(json!({
            "error_type": "AccessDenied",
            "tool": error.tool,
            "reason": error.reason
        })),
    }
}

/// Converts error data to a JSON value for inclusion in error tool results.
pub fn error_to_json(error: &ToolError) -> Value {
    let mcp_error = map_tool_error(error);
    json!({
        "code": mcp_error.code.0,
        "message": mcp_error.message,
        "data": mcp_error.data
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_tool_not_found() {
        let error = ToolError::NotFound("unknown_tool".into());
        let mcp_error = map_tool_error(&error);

        assert_eq!(mcp_error.code, ErrorCode::METHOD_NOT_FOUND);
        assert!(mcp_error.message.contains("unknown_tool"));
        assert!(mcp_error.data.is_some());
    }

    #[test]
    fn test_map_invalid_arguments() {
        let error = ToolError::InvalidArguments("missing field `project_id`".into());
        let mcp_error = map_tool_error(&error);

        assert_eq!(mcp_error.code, ErrorCode::INVALID_PARAMS);
        assert!(mcp_error.message.contains("project_id"));
    }

    #[test]
    fn test_map_gitlab_unauthorized() {
        let mcp_error = map_gitlab_error(&GitLabError::Unauthorized);

        assert_eq!(mcp_error.code, ErrorCode::INTERNAL_ERROR);
        assert!(mcp_error.message.contains("authentication"));
    }

    #[test]
    fn test_map_gitlab_not_found() {
        let error = GitLabError::NotFound {
            resource: "404 Project Not Found".into(),
        };
        let mcp_error = map_gitlab_error(&error);

        assert_eq!(mcp_error.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert!(mcp_error.message.contains("Project"));
    }

    #[test]
    fn test_map_access_denied() {
        let error = AccessDeniedError::read_only("create_issue");
        let mcp_error = map_access_denied_error(&error);

        assert_eq!(mcp_error.code, ErrorCode::INTERNAL_ERROR);
        assert!(mcp_error.message.contains("create_issue"));

        let data = mcp_error.data.unwrap();
        assert_eq!(data["tool"], "create_issue");
    }

    #[test]
    fn test_error_to_json_shape() {
        let error = ToolError::GitLab(GitLabError::Api {
            status: 400,
            message: "branch is missing".into(),
        });
        let value = error_to_json(&error);

        assert_eq!(value["code"], ErrorCode::INTERNAL_ERROR.0);
        assert_eq!(value["data"]["status"], 400);
        assert!(value["message"].as_str().unwrap().contains("branch is missing"));
    }
}
