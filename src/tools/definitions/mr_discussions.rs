//! Merge request discussion tools
//!
//! Positioned comments on the new side of a merge request diff.

use crate::error::{GitLabError, ToolError};
use crate::gitlab::{Commit, Discussion, GitLabClient, MergeRequest};
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::QueryBuilder;
use async_trait::async_trait;
use gitlab_gateway_macros::gitlab_tool;
use serde::Serialize;
use tracing::debug;

fn default_position_type() -> String {
    "text".to_string()
}

/// Position of a diff note
#[derive(Debug, Clone, Serialize)]
pub struct DiffPosition {
    pub base_sha: String,
    pub start_sha: String,
    pub head_sha: String,
    pub position_type: String,
    pub new_path: String,
    pub new_line: u32,
}

#[derive(Debug, Serialize)]
struct NewDiscussion<'a> {
    body: &'a str,
    position: DiffPosition,
}

#[derive(Debug, Serialize)]
struct LineComment<'a> {
    id: String,
    body: &'a str,
    path: &'a str,
    line: u32,
}

/// Comment on a line of a merge request diff
#[gitlab_tool(
    name = "create_merge_request_line_comment",
    description = "Start a discussion on a specific line of a file in a merge request diff. The head commit is taken from the MR source branch unless a branch is given",
    category = "mr_discussions",
    operation = "write"
)]
pub struct CreateMergeRequestLineComment {
    /// Project ID or namespaced path
    pub project_id: String,
    /// Merge request IID
    pub merge_request_iid: u64,
    /// File path on the new side of the diff
    pub path: String,
    /// Line number on the new side of the diff
    pub line: u32,
    /// Comment body (Markdown)
    pub content: String,
    /// Position type (default: text)
    #[serde(default = "default_position_type")]
    pub position_type: String,
    /// Branch whose newest commit is the head SHA (default: the MR source branch)
    #[serde(default)]
    pub branch: Option<String>,
}

impl CreateMergeRequestLineComment {
    /// Newest commit on `branch`
    async fn head_sha(
        &self,
        ctx: &ToolContext,
        project: &str,
        branch: &str,
    ) -> Result<String, ToolError> {
        let query = QueryBuilder::new()
            .param("ref_name", branch)
            .param("per_page", 1)
            .build();
        let commits: Vec<Commit> = ctx
            .gitlab
            .get(&format!("/projects/{}/repository/commits{}", project, query))
            .await?;

        commits
            .into_iter()
            .next()
            .map(|commit| commit.id)
            .ok_or_else(|| {
                GitLabError::NotFound {
                    resource: format!("commits on branch {}", branch),
                }
                .into()
            })
    }
}

#[async_trait]
impl ToolExecutor for CreateMergeRequestLineComment {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let project = GitLabClient::encode_project(&self.project_id);
        let mr_endpoint = format!("/projects/{}/merge_requests/{}", project, self.merge_request_iid);

        let mr: MergeRequest = ctx.gitlab.get(&mr_endpoint).await?;
        let diff_refs = mr.diff_refs.ok_or_else(|| {
            GitLabError::InvalidResponse(format!(
                "merge request !{} has no diff_refs",
                self.merge_request_iid
            ))
        })?;

        let branch = self.branch.as_deref().unwrap_or(&mr.source_branch);
        let head_sha = self.head_sha(ctx, &project, branch).await?;
        debug!(branch = %branch, head_sha = %head_sha, "Resolved head commit");

        let body = NewDiscussion {
            body: &self.content,
            position: DiffPosition {
                base_sha: diff_refs.base_sha,
                start_sha: diff_refs.start_sha,
                head_sha,
                position_type: self.position_type.clone(),
                new_path: self.path.clone(),
                new_line: self.line,
            },
        };

        let discussion: Discussion = ctx
            .gitlab
            .post(&format!("{}/discussions", mr_endpoint), &body)
            .await?;

        ToolOutput::json(&LineComment {
            id: discussion.id,
            body: &self.content,
            path: &self.path,
            line: self.line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let args: CreateMergeRequestLineComment = serde_json::from_value(json!({
            "project_id": "acme/api",
            "merge_request_iid": 7,
            "path": "src/main.rs",
            "line": 12,
            "content": "nit"
        }))
        .unwrap();
        assert_eq!(args.position_type, "text");
        assert!(args.branch.is_none());
    }

    #[test]
    fn test_position_serialization() {
        let position = DiffPosition {
            base_sha: "b".into(),
            start_sha: "s".into(),
            head_sha: "h".into(),
            position_type: "text".into(),
            new_path: "src/main.rs".into(),
            new_line: 12,
        };
        let value = serde_json::to_value(&position).unwrap();
        assert_eq!(value["new_line"], 12);
        assert!(value.get("old_path").is_none());
    }
}
