//! JIRA Issue Tool - fetch JIRA issues for MCP hosts
//!
//! Serves the get_issue tool over STDIO.

use jira_issue_tool::JiraIssueServer;
use pulseengine_mcp_server::McpServerBuilder;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configure logging for STDIO transport
    JiraIssueServer::configure_stdio_logging();

    info!("Starting JIRA Issue Tool...");

    let server = match JiraIssueServer::new().await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create JIRA Issue Server: {}", e);
            eprintln!("❌ Failed to start JIRA Issue Tool: {}", e);
            eprintln!("\nPlease check:");
            eprintln!("  - JIRA_URL is set and starts with http:// or https://");
            eprintln!("  - JIRA_USERNAME and JIRA_API_TOKEN are not empty");
            eprintln!("  - jira-issue-tool.toml (if present) only uses known keys");
            std::process::exit(1);
        }
    };

    info!("Starting MCP server with STDIO transport...");

    let mut server = server.serve_stdio().await?;

    info!("JIRA Issue Tool is running and ready to serve requests");

    server.run().await?;

    Ok(())
}
