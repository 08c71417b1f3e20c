//! Progress and result events streamed back to the host
//!
//! The host hands the tool an [`EventSink`]. The tool reports progress through
//! an [`EventNotifier`], which drops every event when emission is switched off
//! in the configuration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

const IN_PROGRESS_MARKER: &str = "🔎";
const SUCCESS_MARKER: &str = "✅";
const FAILURE_MARKER: &str = "❌";

/// Event sent to the host, serialized as `{"type": ..., "data": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Event {
    Status(StatusData),
    Message(MessageData),
    Citation(CitationData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusData {
    pub description: String,
    pub status: StatusState,
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusState {
    InProgress,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageData {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationData {
    pub document: Vec<String>,
    pub metadata: Vec<CitationMetadata>,
    pub source: CitationSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationMetadata {
    pub source: String,
    pub html: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationSource {
    pub name: String,
}

impl Event {
    /// Build a status event; the description is prefixed with a state marker
    pub fn status(description: &str, done: bool, error: bool) -> Self {
        let marker = match (done, error) {
            (false, _) => IN_PROGRESS_MARKER,
            (true, true) => FAILURE_MARKER,
            (true, false) => SUCCESS_MARKER,
        };

        Event::Status(StatusData {
            description: format!("{} {}", marker, description),
            status: if done {
                StatusState::Complete
            } else {
                StatusState::InProgress
            },
            done,
        })
    }

    pub fn message(content: impl Into<String>) -> Self {
        Event::Message(MessageData {
            content: content.into(),
        })
    }

    /// Build a citation bundling a document with where it came from
    pub fn citation(name: &str, url: &str, content: &str, html: bool) -> Self {
        Event::Citation(CitationData {
            document: vec![content.to_string()],
            metadata: vec![CitationMetadata {
                source: url.to_string(),
                html,
            }],
            source: CitationSource {
                name: name.to_string(),
            },
        })
    }

    /// The `type` tag this event serializes with
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Status(_) => "status",
            Event::Message(_) => "message",
            Event::Citation(_) => "citation",
        }
    }
}

/// The host event sink failed to accept an event
#[derive(Debug, Clone, Error)]
#[error("Event sink failed: {message}")]
pub struct SinkError {
    message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Destination for events, supplied by the host
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn notify(&self, event: Event) -> Result<(), SinkError>;
}

/// Sink that records every event as a structured log line
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn notify(&self, event: Event) -> Result<(), SinkError> {
        let payload =
            serde_json::to_string(&event).map_err(|e| SinkError::new(e.to_string()))?;
        info!(event_type = event.kind(), payload = %payload, "Host event");
        Ok(())
    }
}

/// Sink that forwards events into a channel the host drains
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: UnboundedSender<Event>,
}

impl ChannelEventSink {
    pub fn new(sender: UnboundedSender<Event>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn notify(&self, event: Event) -> Result<(), SinkError> {
        self.sender
            .send(event)
            .map_err(|_| SinkError::new("event receiver dropped"))
    }
}

/// Gated front end to an [`EventSink`]
///
/// When `enabled` is false every emit returns `Ok(())` without touching the
/// sink. Otherwise the sink's result is handed back unchanged: no retry, no
/// buffering.
pub struct EventNotifier<'a> {
    sink: &'a dyn EventSink,
    enabled: bool,
}

impl<'a> EventNotifier<'a> {
    pub fn new(sink: &'a dyn EventSink, enabled: bool) -> Self {
        Self { sink, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn emit_status(
        &self,
        description: &str,
        done: bool,
        error: bool,
    ) -> Result<(), SinkError> {
        self.emit(Event::status(description, done, error)).await
    }

    pub async fn emit_message(&self, content: &str) -> Result<(), SinkError> {
        self.emit(Event::message(content)).await
    }

    pub async fn emit_source(
        &self,
        name: &str,
        url: &str,
        content: &str,
        html: bool,
    ) -> Result<(), SinkError> {
        self.emit(Event::citation(name, url, content, html)).await
    }

    async fn emit(&self, event: Event) -> Result<(), SinkError> {
        if !self.enabled {
            return Ok(());
        }
        self.sink.notify(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    #[test]
    fn test_status_markers() {
        let in_progress = Event::status("Getting issue ABC-1", false, false);
        let failed = Event::status("Failed to get issue ABC-1: boom", true, true);
        let succeeded = Event::status("Got issue ABC-1", true, false);

        match in_progress {
            Event::Status(data) => {
                assert_eq!(data.description, "🔎 Getting issue ABC-1");
                assert_eq!(data.status, StatusState::InProgress);
                assert!(!data.done);
            }
            other => panic!("Expected status event, got {:?}", other),
        }
        match failed {
            Event::Status(data) => {
                assert_eq!(data.description, "❌ Failed to get issue ABC-1: boom");
                assert_eq!(data.status, StatusState::Complete);
            }
            other => panic!("Expected status event, got {:?}", other),
        }
        match succeeded {
            Event::Status(data) => assert_eq!(data.description, "✅ Got issue ABC-1"),
            other => panic!("Expected status event, got {:?}", other),
        }
    }

    #[test]
    fn test_in_progress_ignores_error_flag() {
        assert_eq!(
            Event::status("working", false, true),
            Event::status("working", false, false)
        );
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(
            serde_json::to_value(Event::status("Got issue ABC-1", true, false)).unwrap(),
            json!({
                "type": "status",
                "data": {"description": "✅ Got issue ABC-1", "status": "complete", "done": true}
            })
        );
        assert_eq!(
            serde_json::to_value(Event::message("Comments:\n\nhi")).unwrap(),
            json!({"type": "message", "data": {"content": "Comments:\n\nhi"}})
        );
        assert_eq!(
            serde_json::to_value(Event::citation(
                "Broken login",
                "https://acme.atlassian.net/browse/ABC-1",
                "<p>It fails</p>",
                true
            ))
            .unwrap(),
            json!({
                "type": "citation",
                "data": {
                    "document": ["<p>It fails</p>"],
                    "metadata": [{"source": "https://acme.atlassian.net/browse/ABC-1", "html": true}],
                    "source": {"name": "Broken login"}
                }
            })
        );
    }

    #[tokio::test]
    async fn test_disabled_notifier_never_touches_sink() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelEventSink::new(tx);
        let notifier = EventNotifier::new(&sink, false);
        assert!(!notifier.is_enabled());

        notifier.emit_status("Getting issue", false, false).await.unwrap();
        notifier.emit_message("hello").await.unwrap();
        notifier.emit_source("t", "u", "c", false).await.unwrap();

        drop(notifier);
        drop(sink);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_enabled_notifier_forwards_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelEventSink::new(tx);
        let notifier = EventNotifier::new(&sink, true);
        assert!(notifier.is_enabled());

        notifier.emit_status("Getting issue", false, false).await.unwrap();
        notifier.emit_message("hello").await.unwrap();

        assert_eq!(rx.recv().await.unwrap().kind(), "status");
        assert_eq!(rx.recv().await.unwrap(), Event::message("hello"));
    }

    #[test]
    fn test_closed_channel_reports_sink_error() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let sink = ChannelEventSink::new(tx);
        let notifier = EventNotifier::new(&sink, true);

        let err = tokio_test::block_on(notifier.emit_message("lost")).unwrap_err();
        assert_eq!(err.message(), "event receiver dropped");
    }

    #[tokio::test]
    async fn test_tracing_sink_accepts_everything() {
        let sink = TracingEventSink;
        assert!(sink.notify(Event::message("logged")).await.is_ok());
    }
}
