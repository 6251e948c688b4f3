//! Transport module
//!
//! Stdio and streamable HTTP transports for the MCP server.

pub mod http;
pub mod stdio;

pub use http::{HttpConfig, run_http, run_http_blocking};
pub use stdio::run_stdio;
