//! Project tools
//!
//! Tools for finding and creating GitLab projects.

use crate::error::ToolError;
use crate::gitlab::Project;
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::QueryBuilder;
use async_trait::async_trait;
use gitlab_gateway_macros::gitlab_tool;
use serde::Serialize;

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

fn default_visibility() -> String {
    "private".to_string()
}

fn default_true() -> bool {
    true
}

/// Compact project summary returned by searches
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub id: u64,
    pub name: String,
    /// Namespaced path, e.g. `group/project`
    pub path: String,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            path: project.path_with_namespace,
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchResult {
    projects: Vec<ProjectSummary>,
}

/// Search projects by name
#[gitlab_tool(
    name = "search_repositories",
    description = "Search GitLab projects by name and return their id, name and namespaced path",
    category = "projects",
    operation = "read"
)]
pub struct SearchRepositories {
    /// Search term matched against project names
    pub search: String,
    /// Page number (default: 1)
    #[serde(default = "default_page")]
    pub page: u32,
    /// Results per page (default: 20)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

#[async_trait]
impl ToolExecutor for SearchRepositories {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .param("search", &self.search)
            .param("page", self.page)
            .param("per_page", self.per_page)
            .build();

        let projects: Vec<Project> = ctx.gitlab.get(&format!("/projects{}", query)).await?;

        ToolOutput::json(&SearchResult {
            projects: projects.into_iter().map(ProjectSummary::from).collect(),
        })
    }
}

/// Request body for `POST /projects`
#[derive(Debug, Serialize)]
struct NewProject<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    visibility: &'a str,
    initialize_with_readme: bool,
}

#[derive(Debug, Serialize)]
struct CreatedProject {
    id: u64,
    name: String,
    web_url: Option<String>,
}

/// Create a new project
#[gitlab_tool(
    name = "create_repository",
    description = "Create a new GitLab project",
    category = "projects",
    operation = "write"
)]
pub struct CreateRepository {
    /// Project name
    pub name: String,
    /// Project description
    #[serde(default)]
    pub description: Option<String>,
    /// Visibility: private, internal or public (default: private)
    #[serde(default = "default_visibility")]
    pub visibility: String,
    /// Create an initial README commit (default: true)
    #[serde(default = "default_true")]
    pub initialize_with_readme: bool,
}

#[async_trait]
impl ToolExecutor for CreateRepository {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let body = NewProject {
            name: &self.name,
            description: self.description.as_deref(),
            visibility: &self.visibility,
            initialize_with_readme: self.initialize_with_readme,
        };

        let project: Project = ctx.gitlab.post("/projects", &body).await?;

        ToolOutput::json(&CreatedProject {
            id: project.id,
            name: project.name,
            web_url: project.web_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_defaults() {
        let args: SearchRepositories = serde_json::from_value(json!({"search": "billing"})).unwrap();
        assert_eq!(args.page, 1);
        assert_eq!(args.per_page, 20);
    }

    #[test]
    fn test_create_repository_defaults() {
        let args: CreateRepository = serde_json::from_value(json!({"name": "svc"})).unwrap();
        assert_eq!(args.visibility, "private");
        assert!(args.initialize_with_readme);
        assert!(args.description.is_none());
    }

    #[test]
    fn test_new_project_body_omits_missing_description() {
        let body = NewProject {
            name: "svc",
            description: None,
            visibility: "private",
            initialize_with_readme: true,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("description").is_none());
        assert_eq!(value["initialize_with_readme"], true);
    }

    #[test]
    fn test_summary_uses_namespaced_path() {
        let project: Project = serde_json::from_value(json!({
            "id": 7,
            "name": "billing",
            "path_with_namespace": "acme/billing"
        }))
        .unwrap();
        let summary = ProjectSummary::from(project);
        assert_eq!(summary.path, "acme/billing");
    }
}
