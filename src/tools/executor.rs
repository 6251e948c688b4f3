//! Tool execution framework
//!
//! Defines the traits every tool implements and the per-call context they
//! run in.

use crate::error::ToolError;
use crate::gitlab::GitLabClient;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Tool category, used to group tools in listings and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolCategory {
    Projects,
    Repository,
    MergeRequests,
    MrDiscussions,
    Issues,
}

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::Projects => "projects",
            ToolCategory::Repository => "repository",
            ToolCategory::MergeRequests => "merge_requests",
            ToolCategory::MrDiscussions => "mr_discussions",
            ToolCategory::Issues => "issues",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a tool only reads from GitLab or also changes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Read,
    Write,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Read => "read",
            OperationType::Write => "write",
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, OperationType::Read)
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static metadata about a tool, generated by `#[gitlab_tool]`
pub trait ToolInfo {
    fn name() -> &'static str;
    fn description() -> &'static str;
    fn category() -> ToolCategory;
    fn operation_type() -> OperationType;
}

/// Context passed to every tool invocation
///
/// Cheap to build per call: the client is shared behind an `Arc`.
#[derive(Clone)]
pub struct ToolContext {
    /// Authenticated GitLab client
    pub gitlab: Arc<GitLabClient>,
    /// Correlation id for logs
    pub request_id: String,
    /// Refuse write tools
    pub read_only: bool,
}

impl ToolContext {
    pub fn new(gitlab: Arc<GitLabClient>, request_id: impl Into<String>) -> Self {
        Self {
            gitlab,
            request_id: request_id.into(),
            read_only: false,
        }
    }

    /// Set read-only mode
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// A block of tool output content
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text { text: String },
}

/// Output of a tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub content: Vec<ContentBlock>,
    /// Set when the tool ran but reports a failure
    pub is_error: bool,
}

impl ToolOutput {
    /// Plain text output
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Pretty-printed JSON output of any serializable result
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ToolError> {
        let text = serde_json::to_string_pretty(value)?;
        Ok(Self::text(text))
    }

    /// Pretty-printed JSON output of a raw value
    pub fn json_value(value: serde_json::Value) -> Result<Self, ToolError> {
        Self::json(&value)
    }

    /// Concatenated text of all content blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A tool that can be executed against GitLab
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_output_round_trips() {
        let output = ToolOutput::json_value(json!({"status": "success"})).unwrap();
        assert!(!output.is_error);
        let parsed: serde_json::Value = serde_json::from_str(&output.text_content()).unwrap();
        assert_eq!(parsed["status"], "success");
    }

    #[test]
    fn test_operation_type() {
        assert!(OperationType::Read.is_read_only());
        assert!(!OperationType::Write.is_read_only());
        assert_eq!(OperationType::Write.to_string(), "write");
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ToolCategory::MrDiscussions.to_string(), "mr_discussions");
    }
}
