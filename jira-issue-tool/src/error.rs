//! Error types and handling for the JIRA issue tool
//!
//! Every failure the tool can hit while fetching an issue is one of these
//! variants. Hosts can match on the variant instead of parsing the
//! `Error: ...` string the entry point renders.

use crate::events::SinkError;
use thiserror::Error;

/// Custom error types for the JIRA issue tool
#[derive(Debug, Error)]
pub enum JiraToolError {
    /// JIRA answered with a non-success status
    #[error("JIRA API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The host event sink rejected an event
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// A JIRA payload did not have the expected shape
    #[error("Unexpected JIRA response: {message}")]
    Shape { message: String },

    /// The request never produced a response
    #[error("Network error: {message}")]
    Transport { message: String },

    /// Invalid configuration values
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl JiraToolError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            JiraToolError::Http { .. } => "http",
            JiraToolError::Sink(_) => "sink",
            JiraToolError::Shape { .. } => "shape",
            JiraToolError::Transport { .. } => "transport",
            JiraToolError::Configuration { .. } => "configuration",
        }
    }

    /// HTTP status code, when JIRA produced one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            JiraToolError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Create an HTTP status error
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        JiraToolError::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a response shape error
    pub fn shape(message: impl Into<String>) -> Self {
        JiraToolError::Shape {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        JiraToolError::Transport {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        JiraToolError::Configuration {
            message: message.into(),
        }
    }
}

/// Convert from reqwest errors
impl From<reqwest::Error> for JiraToolError {
    fn from(err: reqwest::Error) -> Self {
        // Only status errors carry a code
        match err.status() {
            Some(status) => JiraToolError::http(status.as_u16(), err.to_string()),
            None => JiraToolError::transport(err.to_string()),
        }
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for JiraToolError {
    fn from(err: serde_json::Error) -> Self {
        JiraToolError::shape(err.to_string())
    }
}

/// Convert from TOML parsing errors
impl From<toml::de::Error> for JiraToolError {
    fn from(err: toml::de::Error) -> Self {
        JiraToolError::config(format!("TOML parsing error: {}", err))
    }
}

/// Result type alias for JIRA issue tool operations
pub type JiraToolResult<T> = Result<T, JiraToolError>;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_error_categories() {
        assert_eq!(JiraToolError::http(404, "nope").category(), "http");
        assert_eq!(JiraToolError::shape("test").category(), "shape");
        assert_eq!(JiraToolError::transport("test").category(), "transport");
        assert_eq!(JiraToolError::config("test").category(), "configuration");
        assert_eq!(
            JiraToolError::from(SinkError::new("closed")).category(),
            "sink"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = JiraToolError::http(404, r#"{"errorMessages":["Issue does not exist"]}"#);
        assert_eq!(
            err.to_string(),
            r#"JIRA API returned HTTP 404: {"errorMessages":["Issue does not exist"]}"#
        );
        assert_eq!(err.status_code(), Some(404));

        let err = JiraToolError::from(SinkError::new("host went away"));
        assert_eq!(err.to_string(), "Event sink failed: host went away");
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_serde_json_conversion() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: JiraToolError = parse_error.into();
        assert_matches!(err, JiraToolError::Shape { .. });
    }

    #[test]
    fn test_toml_conversion() {
        let parse_error = toml::from_str::<toml::Table>("username = ").unwrap_err();
        let err: JiraToolError = parse_error.into();
        assert_matches!(err, JiraToolError::Configuration { message } if message.starts_with("TOML parsing error"));
    }
}
