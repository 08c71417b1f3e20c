//! JIRA Issue Tool Library
//!
//! Fetches a single JIRA issue (title, rendered description, status, link and
//! comments) over the JIRA Cloud REST API and hands it back as JSON text,
//! optionally streaming progress events to the host while it works.
//!
//! ## Features
//!
//! - **One-call fetch**: issue fields and comments combined into one record
//! - **Host events**: status, message and citation events through an [`events::EventSink`]
//! - **Typed failures**: [`error::JiraToolError`] for hosts that want more than a string
//! - **MCP server**: the same tool exposed over stdio

use crate::config::JiraConfig;
use crate::error::JiraToolResult;
use crate::events::TracingEventSink;
use crate::tools::{GetIssueParams, GetIssueTool};

use pulseengine_mcp_macros::{mcp_server, mcp_tools};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

// Re-export modules for external use
pub mod config;
pub mod error;
pub mod events;
pub mod issue;
pub mod jira_client;
pub mod tools;

/// Server status information
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JiraServerStatus {
    pub server_name: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub jira_url: String,
    pub emit_events: bool,
}

/// JIRA Issue Server
///
/// Exposes the get_issue tool over MCP. Events produced while fetching are
/// written to the log through [`TracingEventSink`].
#[mcp_server(
    name = "JIRA Issue Tool",
    version = "0.1.0",
    description = "Fetch a JIRA issue with its comments as JSON",
    auth = "disabled"
)]
#[derive(Clone)]
pub struct JiraIssueServer {
    /// Server start time for uptime calculation
    start_time: Instant,

    /// Configuration
    config: Arc<JiraConfig>,

    /// Tool implementations
    get_issue_tool: Arc<GetIssueTool>,
}

impl Default for JiraIssueServer {
    /// Server running on the placeholder configuration
    fn default() -> Self {
        Self::from_config(JiraConfig::default())
    }
}

impl JiraIssueServer {
    /// Create a new server from configuration files and the environment
    #[instrument]
    pub async fn new() -> JiraToolResult<Self> {
        info!("Initializing JIRA Issue Server");

        let config = JiraConfig::load()?;
        info!("Configuration loaded successfully");

        Ok(Self::from_config(config))
    }

    /// Create server with custom configuration (for testing)
    #[instrument(skip(config))]
    pub async fn with_config(config: JiraConfig) -> JiraToolResult<Self> {
        Ok(Self::from_config(config))
    }

    fn from_config(config: JiraConfig) -> Self {
        let config = Arc::new(config);
        let get_issue_tool = Arc::new(GetIssueTool::new(Arc::clone(&config)));

        Self {
            start_time: Instant::now(),
            config,
            get_issue_tool,
        }
    }

    /// Get server uptime in seconds
    fn get_uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// All public methods in this impl block become MCP tools automatically
/// The #[mcp_tools] macro discovers these methods and exposes them via MCP
#[mcp_tools]
impl JiraIssueServer {
    /// Get a JIRA issue by its ID
    ///
    /// The response is JSON with the title, the description rendered as HTML,
    /// the status name, a link to the issue and its comments. Failures are
    /// returned as a string starting with `Error: `.
    ///
    /// # Examples
    /// - `{"issue_id": "PROJ-123"}`
    #[instrument(skip(self))]
    pub async fn get_issue(&self, params: GetIssueParams) -> anyhow::Result<String> {
        Ok(self
            .get_issue_tool
            .execute(&params.issue_id, &TracingEventSink)
            .await)
    }

    /// Get server status and configuration summary
    #[instrument(skip(self))]
    pub async fn get_server_status(&self) -> anyhow::Result<JiraServerStatus> {
        info!("Getting server status");

        Ok(JiraServerStatus {
            server_name: "JIRA Issue Tool".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.get_uptime_seconds(),
            jira_url: self.config.base_url().to_string(),
            emit_events: self.config.emit_events(),
        })
    }
}
