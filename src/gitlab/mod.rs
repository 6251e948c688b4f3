//! GitLab API module
//!
//! Typed client for the GitLab REST API and the response shapes it reads.

pub mod client;
pub mod types;

pub use client::GitLabClient;
pub use types::*;
