//! Issue tools

use crate::error::ToolError;
use crate::gitlab::{GitLabClient, Issue};
use crate::tools::definitions::merge_requests::CreatedItem;
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use async_trait::async_trait;
use gitlab_gateway_macros::gitlab_tool;
use serde::Serialize;

/// Request body for `POST /projects/:id/issues`
#[derive(Debug, Serialize)]
struct NewIssue<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    labels: &'a [String],
}

/// Open an issue
#[gitlab_tool(
    name = "create_issue",
    description = "Create a new issue in a GitLab project",
    category = "issues",
    operation = "write"
)]
pub struct CreateIssue {
    /// Project ID or namespaced path
    pub project_id: String,
    /// Issue title
    pub title: String,
    /// Issue description (Markdown)
    #[serde(default)]
    pub description: Option<String>,
    /// Labels to apply
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

#[async_trait]
impl ToolExecutor for CreateIssue {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let endpoint = format!(
            "/projects/{}/issues",
            GitLabClient::encode_project(&self.project_id)
        );
        let body = NewIssue {
            title: &self.title,
            description: self.description.as_deref(),
            labels: self.labels.as_deref().unwrap_or_default(),
        };

        let issue: Issue = ctx.gitlab.post(&endpoint, &body).await?;

        ToolOutput::json(&CreatedItem {
            id: issue.iid,
            web_url: issue.web_url,
            state: issue.state,
        })
    }
}
