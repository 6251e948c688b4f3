//! Tool definitions
//!
//! Each tool registers itself through `#[gitlab_tool]`; see
//! [`ToolRegistry::with_all_tools`](crate::tools::ToolRegistry::with_all_tools).

pub mod issues;
pub mod merge_requests;
pub mod mr_discussions;
pub mod projects;
pub mod repository;
