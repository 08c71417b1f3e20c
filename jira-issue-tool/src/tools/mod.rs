//! Tools module for the JIRA issue tool
//!
//! Contains the MCP tools exposed by the server.

pub mod get_issue;

pub use get_issue::*;
