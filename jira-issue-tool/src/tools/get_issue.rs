//! Get issue tool: fetch one JIRA issue and report progress to the host
//!
//! Each call builds its own client, reports progress through the host's event
//! sink (when enabled) and hands back either the issue as pretty JSON or a
//! short `Error: ...` string.

use crate::config::JiraConfig;
use crate::error::JiraToolResult;
use crate::events::{EventNotifier, EventSink};
use crate::issue::{format_comments, IssueRecord};
use crate::jira_client::JiraClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Parameters for the get_issue tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetIssueParams {
    /// JIRA issue key or numeric ID (required)
    /// Examples: "PROJ-123", "10042"
    pub issue_id: String,
}

/// Implementation of the get_issue tool
pub struct GetIssueTool {
    config: Arc<JiraConfig>,
}

impl GetIssueTool {
    /// Create a new get issue tool
    pub fn new(config: Arc<JiraConfig>) -> Self {
        Self { config }
    }

    /// Fetch the issue and render the host-facing result string
    ///
    /// Never fails: errors come back as `Error: {message}`.
    pub async fn execute(&self, issue_id: &str, sink: &dyn EventSink) -> String {
        let record = match self.fetch_issue(issue_id, sink).await {
            Ok(record) => record,
            Err(e) => return format!("Error: {}", e),
        };

        match serde_json::to_string_pretty(&record) {
            Ok(rendered) => rendered,
            Err(e) => {
                error!("Failed to serialize issue {}: {}", issue_id, e);
                format!("Error: {}", e)
            }
        }
    }

    /// Fetch the issue, emitting progress events along the way
    ///
    /// On failure a final error status is emitted before the error is returned.
    #[instrument(skip(self, sink))]
    pub async fn fetch_issue(
        &self,
        issue_id: &str,
        sink: &dyn EventSink,
    ) -> JiraToolResult<IssueRecord> {
        let notifier = EventNotifier::new(sink, self.config.emit_events());

        match self.run(issue_id, &notifier).await {
            Ok(record) => Ok(record),
            Err(e) => {
                error!(category = e.category(), "Failed to get issue {}: {}", issue_id, e);

                let description = format!("Failed to get issue {}: {}", issue_id, e);
                if let Err(sink_err) = notifier.emit_status(&description, true, true).await {
                    warn!("Could not report failure to host: {}", sink_err);
                }
                Err(e)
            }
        }
    }

    async fn run(&self, issue_id: &str, notifier: &EventNotifier<'_>) -> JiraToolResult<IssueRecord> {
        info!("Executing get_issue tool for issue: {}", issue_id);

        notifier
            .emit_status(&format!("Getting issue {}", issue_id), false, false)
            .await?;

        let client = JiraClient::new(&self.config)?;
        let record = client.get_issue(issue_id).await?;

        notifier
            .emit_source(
                &record.title,
                &record.link,
                record.description.as_deref().unwrap_or_default(),
                true,
            )
            .await?;

        if notifier.is_enabled() && !record.comments.is_empty() {
            let content = format_comments(&record.comments);
            notifier
                .emit_message(&format!("Comments:\n\n{}", content))
                .await?;
        }

        notifier
            .emit_status(&format!("Got issue {}", issue_id), true, false)
            .await?;

        Ok(record)
    }
}
