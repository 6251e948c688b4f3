//! Merge request tools

use crate::error::ToolError;
use crate::gitlab::{GitLabClient, MergeRequest};
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::QueryBuilder;
use async_trait::async_trait;
use gitlab_gateway_macros::gitlab_tool;
use serde::Serialize;
use serde_json::Value;

/// Request body for `POST /projects/:id/merge_requests`
#[derive(Debug, Serialize)]
struct NewMergeRequest<'a> {
    title: &'a str,
    source_branch: &'a str,
    target_branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    draft: bool,
}

/// Summary of a created merge request or issue
#[derive(Debug, Serialize)]
pub struct CreatedItem {
    /// Project-scoped IID
    pub id: u64,
    pub web_url: String,
    pub state: String,
}

/// Open a merge request
#[gitlab_tool(
    name = "create_merge_request",
    description = "Create a merge request from a source branch into a target branch",
    category = "merge_requests",
    operation = "write"
)]
pub struct CreateMergeRequest {
    /// Project ID or namespaced path
    pub project_id: String,
    /// Merge request title
    pub title: String,
    /// Branch containing the changes
    pub source_branch: String,
    /// Branch to merge into
    pub target_branch: String,
    /// Merge request description (Markdown)
    #[serde(default)]
    pub description: Option<String>,
    /// Open as a draft
    #[serde(default)]
    pub draft: bool,
}

#[async_trait]
impl ToolExecutor for CreateMergeRequest {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let endpoint = format!(
            "/projects/{}/merge_requests",
            GitLabClient::encode_project(&self.project_id)
        );
        let body = NewMergeRequest {
            title: &self.title,
            source_branch: &self.source_branch,
            target_branch: &self.target_branch,
            description: self.description.as_deref(),
            draft: self.draft,
        };

        let mr: MergeRequest = ctx.gitlab.post(&endpoint, &body).await?;

        ToolOutput::json(&CreatedItem {
            id: mr.iid,
            web_url: mr.web_url,
            state: mr.state,
        })
    }
}

#[derive(Debug, Serialize)]
struct DiffList {
    diffs: Vec<Value>,
}

/// Fetch the per-file diffs of a merge request
#[gitlab_tool(
    name = "get_merge_request_diff",
    description = "Get the per-file diffs of a merge request as reported by GitLab",
    category = "merge_requests",
    operation = "read"
)]
pub struct GetMergeRequestDiff {
    /// Project ID or namespaced path
    pub project_id: String,
    /// Merge request IID
    pub merge_request_iid: u64,
    /// Page number
    #[serde(default)]
    pub page: Option<u32>,
    /// Diffs per page
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[async_trait]
impl ToolExecutor for GetMergeRequestDiff {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .optional("page", self.page)
            .optional("per_page", self.per_page)
            .build();
        let endpoint = format!(
            "/projects/{}/merge_requests/{}/diffs{}",
            GitLabClient::encode_project(&self.project_id),
            self.merge_request_iid,
            query
        );

        let diffs: Vec<Value> = ctx.gitlab.get(&endpoint).await?;
        ToolOutput::json(&DiffList { diffs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_without_description() {
        let body = NewMergeRequest {
            title: "Add feature",
            source_branch: "feature",
            target_branch: "main",
            description: None,
            draft: false,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.as_object().unwrap().get("description").is_none());
        assert_eq!(value["draft"], false);
    }

    #[test]
    fn test_draft_defaults_to_false() {
        let args: CreateMergeRequest = serde_json::from_value(json!({
            "project_id": "1",
            "title": "t",
            "source_branch": "a",
            "target_branch": "b"
        }))
        .unwrap();
        assert!(!args.draft);
    }
}
