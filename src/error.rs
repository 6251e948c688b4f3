//! Error types for gitlab-gateway
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API,
//! and convert to MCP error responses at the boundary (see [`mcp_mapper`]).

pub mod mcp_mapper;

use serde::Deserialize;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },
}

/// GitLab API specific errors
#[derive(Error, Debug)]
pub enum GitLabError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitLab API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized: invalid or expired token")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Invalid response from GitLab: {0}")]
    InvalidResponse(String),
}

/// Error body shapes GitLab uses (`{"message": ...}` or `{"error": ...}`)
#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Pull a human-readable message out of a GitLab error body.
///
/// `message` may be a string or a field → errors object; both are flattened
/// to a single line. Falls back to the raw body.
fn extract_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            message: Some(serde_json::Value::String(message)),
            ..
        }) => message,
        Ok(ApiErrorBody {
            message: Some(other),
            ..
        }) => other.to_string(),
        Ok(ApiErrorBody {
            error: Some(error), ..
        }) => error,
        _ => body.trim().to_string(),
    }
}

impl GitLabError {
    /// Create an appropriate error from an HTTP status code and response body
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(body);
        match status {
            401 => GitLabError::Unauthorized,
            403 => GitLabError::Forbidden {
                message: if message.is_empty() {
                    "insufficient permissions for this operation".into()
                } else {
                    message
                },
            },
            404 => GitLabError::NotFound {
                resource: if message.is_empty() {
                    "requested resource".into()
                } else {
                    message
                },
            },
            _ => GitLabError::Api {
                status,
                message: if message.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    message
                },
            },
        }
    }

    /// True if GitLab reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, GitLabError::NotFound { .. })
    }
}

/// Access denial for a tool call
#[derive(Error, Debug)]
#[error("Access denied for tool '{tool}': {reason}")]
pub struct AccessDeniedError {
    pub tool: String,
    pub reason: String,
}

impl AccessDeniedError {
    pub fn read_only(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            reason: "write operations are not permitted in read-only mode".into(),
        }
    }
}

/// Tool execution errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("GitLab API error: {0}")]
    GitLab(#[from] GitLabError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(#[from] AccessDeniedError),
}

impl ToolError {
    /// Whether this error concerns the request itself rather than its execution
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, ToolError::NotFound(_) | ToolError::InvalidArguments(_))
    }
}

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bind address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),

    #[error("HTTP server error: {0}")]
    Http(String),
}

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No GitLab token configured (set GITLAB_TOKEN)")]
    NotConfigured,

    #[error("Invalid token: token must not be empty")]
    InvalidToken,
}

/// Result type alias for GitLab API operations
pub type GitLabResult<T> = std::result::Result<T, GitLabError>;
