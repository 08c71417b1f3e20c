//! JIRA REST client
//!
//! Thin authenticated wrapper over `reqwest` for the JIRA Cloud REST API v3,
//! plus the issue fetch that combines the issue and comment endpoints.

use crate::config::JiraConfig;
use crate::error::{JiraToolError, JiraToolResult};
use crate::issue::{comments_from_payload, Comment, IssueRecord};
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

const API_PREFIX: &str = "rest/api/3";
const ISSUE_FIELDS: &str = "summary,description,status";

/// Authenticated JIRA client
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: Client,
    base_url: String,
    api_root: String,
    auth_header: String,
}

/// Build the `Authorization` header value for basic authentication
pub fn basic_auth_header(username: &str, api_token: &str) -> String {
    let credentials = format!("{}:{}", username, api_token);
    format!("Basic {}", general_purpose::STANDARD.encode(credentials))
}

impl JiraClient {
    /// Create a new JIRA client with the given configuration
    pub fn new(config: &JiraConfig) -> JiraToolResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| JiraToolError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            api_root: format!("{}/{}", config.base_url(), API_PREFIX),
            auth_header: basic_auth_header(config.username(), config.api_token()),
        })
    }

    /// Root every endpoint is resolved against
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Browser link for an issue
    pub fn browse_url(&self, issue_id: &str) -> String {
        format!("{}/browse/{}", self.base_url, issue_id)
    }

    /// GET an endpoint relative to the API root and parse the JSON body
    #[instrument(skip(self))]
    pub async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> JiraToolResult<Value> {
        let url = format!("{}/{}", self.api_root, endpoint);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(CONTENT_TYPE, "application/json")
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("JIRA returned {} for {}", status, url);
            return Err(JiraToolError::http(status.as_u16(), body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch an issue together with all of its comments
    ///
    /// The comment request only runs after the issue request succeeded, and a
    /// failure in either one fails the whole fetch.
    #[instrument(skip(self))]
    pub async fn get_issue(&self, issue_id: &str) -> JiraToolResult<IssueRecord> {
        debug!("Fetching issue {}", issue_id);

        let payload = self
            .get(
                &format!("issue/{}", issue_id),
                &[("fields", ISSUE_FIELDS), ("expand", "renderedFields")],
            )
            .await?;

        let comments = self.get_comments(issue_id).await?;

        let record = IssueRecord::from_payload(payload, self.browse_url(issue_id), comments)?;
        info!(
            "Fetched issue {} ({} comments)",
            issue_id,
            record.comments.len()
        );
        Ok(record)
    }

    /// Fetch the comments of an issue in creation order
    #[instrument(skip(self))]
    pub async fn get_comments(&self, issue_id: &str) -> JiraToolResult<Vec<Comment>> {
        let payload = self.get(&format!("issue/{}/comment", issue_id), &[]).await?;
        comments_from_payload(payload)
    }
}
