//! GitLab API response types
//!
//! Only the fields the gateway reads are modelled; everything else in a
//! response is ignored.

use crate::error::{GitLabError, GitLabResult};
use base64::Engine;
use serde::Deserialize;

/// GitLab project
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub path_with_namespace: String,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// A file fetched from `/repository/files/:path`
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryFile {
    pub file_path: String,
    #[serde(default)]
    pub encoding: Option<String>,
    pub content: String,
}

impl RepositoryFile {
    /// Decode the file body to text.
    ///
    /// GitLab sends base64 by default; `text` encoded content is returned as is.
    pub fn decoded_content(&self) -> GitLabResult<String> {
        match self.encoding.as_deref() {
            Some("base64") | None => {
                // GitLab may wrap long base64 payloads
                let compact: String = self.content.split_whitespace().collect();
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(compact)
                    .map_err(|e| {
                        GitLabError::InvalidResponse(format!(
                            "Failed to decode base64 content of {}: {}",
                            self.file_path, e
                        ))
                    })?;
                String::from_utf8(bytes).map_err(|_| {
                    GitLabError::InvalidResponse(format!("{} is not valid UTF-8", self.file_path))
                })
            }
            Some(_) => Ok(self.content.clone()),
        }
    }
}

/// Base and start commits of a merge request diff
///
/// The head commit is resolved from the branch instead.
#[derive(Debug, Clone, Deserialize)]
pub struct DiffRefs {
    pub base_sha: String,
    pub start_sha: String,
}

/// GitLab merge request
#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequest {
    pub iid: u64,
    pub state: String,
    pub web_url: String,
    pub source_branch: String,
    #[serde(default)]
    pub diff_refs: Option<DiffRefs>,
}

/// GitLab issue
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub iid: u64,
    pub state: String,
    pub web_url: String,
}

/// GitLab commit
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub id: String,
}

/// GitLab discussion thread
#[derive(Debug, Clone, Deserialize)]
pub struct Discussion {
    pub id: String,
}
