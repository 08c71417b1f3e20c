/// Common utilities for JIRA issue tool integration tests
use async_trait::async_trait;
use jira_issue_tool::config::JiraConfig;
use jira_issue_tool::events::{Event, EventSink, SinkError};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USERNAME: &str = "bot";
pub const API_TOKEN: &str = "secret";
pub const AUTH_HEADER: &str = "Basic Ym90OnNlY3JldA==";

/// Sink that keeps every event it receives
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.events().iter().filter(|e| e.kind() == kind).count()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn notify(&self, event: Event) -> Result<(), SinkError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Sink that rejects one event kind and counts every call
pub struct FailingSink {
    reject: &'static str,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl FailingSink {
    pub fn rejecting(reject: &'static str) -> Self {
        Self {
            reject,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSink for FailingSink {
    async fn notify(&self, event: Event) -> Result<(), SinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if event.kind() == self.reject {
            return Err(SinkError::new(format!("host refused {} event", self.reject)));
        }
        Ok(())
    }
}

/// Configuration pointing at the mock server
pub fn config_for(server: &MockServer, emit_events: bool) -> JiraConfig {
    JiraConfig::new(USERNAME, API_TOKEN, server.uri())
        .expect("valid test config")
        .with_emit_events(emit_events)
}

pub fn issue_json(summary: &str, status: &str) -> Value {
    json!({
        "expand": "renderedFields",
        "id": "10001",
        "key": "ABC-1",
        "fields": {
            "summary": summary,
            "description": {"type": "doc", "version": 1, "content": []},
            "status": {"name": status, "id": "3"}
        },
        "renderedFields": {
            "description": "<p>Clicking login has no effect</p>"
        }
    })
}

pub fn comments_json(comments: &[(&str, &str, &str)]) -> Value {
    let comments: Vec<Value> = comments
        .iter()
        .map(|(author, body, created)| {
            json!({
                "id": "20001",
                "author": {"accountId": "abc", "displayName": author},
                "body": body,
                "created": created,
                "updated": created
            })
        })
        .collect();

    json!({
        "startAt": 0,
        "maxResults": 50,
        "total": comments.len(),
        "comments": comments
    })
}

/// Mount the issue endpoint; only matches the documented request shape
#[allow(dead_code)]
pub async fn mount_issue(
    server: &MockServer,
    issue_id: &str,
    response: ResponseTemplate,
    expected_calls: u64,
) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/api/3/issue/{}", issue_id)))
        .and(query_param("fields", "summary,description,status"))
        .and(query_param("expand", "renderedFields"))
        .and(header("authorization", AUTH_HEADER))
        .and(header("content-type", "application/json"))
        .respond_with(response)
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Mount the comment endpoint
#[allow(dead_code)]
pub async fn mount_comments(
    server: &MockServer,
    issue_id: &str,
    response: ResponseTemplate,
    expected_calls: u64,
) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/api/3/issue/{}/comment", issue_id)))
        .and(header("authorization", AUTH_HEADER))
        .and(header("content-type", "application/json"))
        .respond_with(response)
        .expect(expected_calls)
        .mount(server)
        .await;
}
