//! Configuration module
//!
//! Layered configuration: defaults, then an optional TOML file, then
//! environment variables (`GITLAB_GATEWAY__*`, `GITLAB_URL`, `GITLAB_TOKEN`).

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::*;
