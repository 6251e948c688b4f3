//! GitLab Gateway
//!
//! A Model Context Protocol server exposing a small, fixed set of GitLab
//! operations as tools.
//!
//! ## Tools
//!
//! | Tool | GitLab call |
//! |------|-------------|
//! | `search_repositories` | `GET /projects?search=` |
//! | `create_repository` | `POST /projects` |
//! | `get_file_contents` | `GET /projects/:id/repository/files/:path` |
//! | `create_or_update_file` | look the file up, then `PUT` or `POST` it |
//! | `create_merge_request` | `POST /projects/:id/merge_requests` |
//! | `create_issue` | `POST /projects/:id/issues` |
//! | `create_merge_request_line_comment` | `POST /projects/:id/merge_requests/:iid/discussions` |
//! | `get_merge_request_diff` | `GET /projects/:id/merge_requests/:iid/diffs` |
//!
//! ## Example Configuration
//!
//! ```toml
//! [gitlab]
//! url = "https://gitlab.example.com"
//! # token from GITLAB_TOKEN env var
//!
//! [server]
//! transport = "http"
//! read_only = true
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod server;
pub mod tools;
pub mod transport;
pub mod util;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use gitlab::GitLabClient;
pub use server::GatewayHandler;
