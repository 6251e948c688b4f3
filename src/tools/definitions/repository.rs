//! Repository tools
//!
//! Tools for reading and writing files in a project's repository.

use crate::error::{GitLabError, ToolError};
use crate::gitlab::{GitLabClient, Project, RepositoryFile};
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::QueryBuilder;
use async_trait::async_trait;
use gitlab_gateway_macros::gitlab_tool;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Outcome of looking a file up at a ref
#[derive(Debug)]
pub enum FileLookup {
    Found(RepositoryFile),
    NotFound,
    Failed(GitLabError),
}

/// Endpoint of a single repository file
fn file_endpoint(project_id: &str, file_path: &str) -> String {
    format!(
        "/projects/{}/repository/files/{}",
        GitLabClient::encode_project(project_id),
        GitLabClient::encode_file_path(file_path)
    )
}

/// Fetch the project, so a missing project fails before any file lookup
async fn fetch_project(gitlab: &GitLabClient, project_id: &str) -> Result<Project, ToolError> {
    let endpoint = format!("/projects/{}", GitLabClient::encode_project(project_id));
    Ok(gitlab.get(&endpoint).await?)
}

/// Look a file up, keeping "missing" apart from every other failure
///
/// Callers fetch the project first; a 404 here then means the file (or the
/// ref) does not exist.
pub async fn lookup_file(
    gitlab: &GitLabClient,
    project_id: &str,
    file_path: &str,
    ref_name: &str,
) -> FileLookup {
    let endpoint = format!(
        "{}{}",
        file_endpoint(project_id, file_path),
        QueryBuilder::new().param("ref", ref_name).build()
    );

    match gitlab.get::<RepositoryFile>(&endpoint).await {
        Ok(file) => FileLookup::Found(file),
        Err(e) if e.is_not_found() => FileLookup::NotFound,
        Err(e) => FileLookup::Failed(e),
    }
}

/// Read a file's decoded text content
#[gitlab_tool(
    name = "get_file_contents",
    description = "Get the decoded text content of a file in a GitLab repository. Uses the project's default branch when no ref is given",
    category = "repository",
    operation = "read"
)]
pub struct GetFileContents {
    /// Project ID or namespaced path (e.g., "group/project")
    pub project_id: String,
    /// Path of the file in the repository
    pub file_path: String,
    /// Branch, tag or commit SHA (default: the project's default branch)
    #[serde(default, rename = "ref")]
    pub ref_name: Option<String>,
}

#[async_trait]
impl ToolExecutor for GetFileContents {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let project = fetch_project(&ctx.gitlab, &self.project_id).await?;
        // Empty repositories have no default branch
        let ref_name = match &self.ref_name {
            Some(ref_name) => ref_name.clone(),
            None => project.default_branch.unwrap_or_else(|| "HEAD".to_string()),
        };

        match lookup_file(&ctx.gitlab, &self.project_id, &self.file_path, &ref_name).await {
            FileLookup::Found(file) => {
                let content = file.decoded_content()?;
                ToolOutput::json_value(serde_json::json!({ "content": content }))
            }
            FileLookup::NotFound => ToolOutput::json_value(serde_json::json!({
                "error": format!("File {} not found", self.file_path)
            })),
            FileLookup::Failed(e) => Err(e.into()),
        }
    }
}

/// Request body shared by file create and update
#[derive(Debug, Serialize)]
struct FileCommit<'a> {
    branch: &'a str,
    content: &'a str,
    commit_message: &'a str,
}

/// Create or overwrite a file
#[gitlab_tool(
    name = "create_or_update_file",
    description = "Create a file on a branch, or overwrite it if it already exists, as a single commit",
    category = "repository",
    operation = "write"
)]
pub struct CreateOrUpdateFile {
    /// Project ID or namespaced path
    pub project_id: String,
    /// Path of the file in the repository
    pub file_path: String,
    /// New file content
    pub content: String,
    /// Commit message
    pub commit_message: String,
    /// Branch to commit to
    pub branch: String,
}

#[async_trait]
impl ToolExecutor for CreateOrUpdateFile {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let endpoint = file_endpoint(&self.project_id, &self.file_path);
        let body = FileCommit {
            branch: &self.branch,
            content: &self.content,
            commit_message: &self.commit_message,
        };

        fetch_project(&ctx.gitlab, &self.project_id).await?;

        let _: Value =
            match lookup_file(&ctx.gitlab, &self.project_id, &self.file_path, &self.branch).await {
                FileLookup::Found(_) => {
                    debug!(file_path = %self.file_path, "File exists, updating");
                    ctx.gitlab.put(&endpoint, &body).await?
                }
                FileLookup::NotFound => {
                    debug!(file_path = %self.file_path, "File missing, creating");
                    ctx.gitlab.post(&endpoint, &body).await?
                }
                FileLookup::Failed(e) => return Err(e.into()),
            };

        ToolOutput::json_value(serde_json::json!({
            "status": "success",
            "file_path": self.file_path,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ref_field_name() {
        let args: GetFileContents = serde_json::from_value(json!({
            "project_id": "acme/api",
            "file_path": "README.md",
            "ref": "develop"
        }))
        .unwrap();
        assert_eq!(args.ref_name.as_deref(), Some("develop"));
    }

    #[test]
    fn test_file_endpoint_encodes_both_parts() {
        assert_eq!(
            file_endpoint("acme/api", "docs/guide.md"),
            "/projects/acme%2Fapi/repository/files/docs%2Fguide.md"
        );
    }

    #[test]
    fn test_upsert_requires_branch() {
        let result: Result<CreateOrUpdateFile, _> = serde_json::from_value(json!({
            "project_id": "1",
            "file_path": "a.txt",
            "content": "x",
            "commit_message": "m"
        }));
        assert!(result.is_err());
    }
}
