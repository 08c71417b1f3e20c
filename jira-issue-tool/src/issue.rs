//! Issue record returned to the host and the JIRA payloads it is built from

use crate::error::JiraToolResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One JIRA issue with its comments, as handed back to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub title: String,
    /// HTML rendered by JIRA; `None` when the issue has no description
    pub description: Option<String>,
    pub status: String,
    pub link: String,
    pub comments: Vec<Comment>,
}

/// Comment information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    /// Passed through as JIRA sent it (plain text or Atlassian Document Format)
    pub body: Value,
    pub created: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssuePayload {
    fields: IssueFields,
    rendered_fields: RenderedFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    summary: String,
    status: StatusField,
}

#[derive(Debug, Deserialize)]
struct StatusField {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RenderedFields {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentPage {
    #[serde(default)]
    comments: Vec<CommentPayload>,
}

#[derive(Debug, Deserialize)]
struct CommentPayload {
    author: CommentAuthor,
    body: Value,
    created: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentAuthor {
    display_name: String,
}

impl IssueRecord {
    /// Reshape the `issue/{id}` payload and the already-reshaped comments
    pub fn from_payload(
        payload: Value,
        link: String,
        comments: Vec<Comment>,
    ) -> JiraToolResult<Self> {
        let issue: IssuePayload = serde_json::from_value(payload)?;

        Ok(Self {
            title: issue.fields.summary,
            description: issue.rendered_fields.description,
            status: issue.fields.status.name,
            link,
            comments,
        })
    }
}

/// Reshape the `issue/{id}/comment` payload, keeping JIRA's order
pub fn comments_from_payload(payload: Value) -> JiraToolResult<Vec<Comment>> {
    let page: CommentPage = serde_json::from_value(payload)?;

    Ok(page
        .comments
        .into_iter()
        .map(|c| Comment {
            author: c.author.display_name,
            body: c.body,
            created: c.created,
        })
        .collect())
}

/// Render comments as one markdown block, blank line between entries
pub fn format_comments(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|c| format!("**{}** ({}): {}", c.author, c.created, body_text(&c.body)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn body_text(body: &Value) -> String {
    match body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
