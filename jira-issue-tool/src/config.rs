//! Configuration management for the JIRA issue tool
//!
//! Handles loading configuration from environment variables, TOML files,
//! and falls back to placeholder values that point the user at what to fill in.

use crate::error::{JiraToolError, JiraToolResult};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Placeholder username shipped with the default configuration
pub const DEFAULT_USERNAME: &str = "<user>@<org>.ai";
/// Placeholder API token shipped with the default configuration
pub const DEFAULT_API_TOKEN: &str = "<key>";
/// Placeholder JIRA base URL shipped with the default configuration
pub const DEFAULT_BASE_URL: &str = "https://<org>.atlassian.net/";

const CONFIG_FILES: [&str; 2] = ["config/jira-issue-tool.toml", "jira-issue-tool.toml"];

/// Validated, immutable configuration for talking to one JIRA instance
#[derive(Clone, PartialEq, Eq)]
pub struct JiraConfig {
    username: String,
    api_token: String,
    base_url: String,
    emit_events: bool,
}

/// Raw configuration values as read from a TOML file or the environment
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigSource {
    pub username: Option<String>,
    pub api_token: Option<String>,
    pub base_url: Option<String>,
    pub emit_events: Option<bool>,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            api_token: DEFAULT_API_TOKEN.to_string(),
            base_url: DEFAULT_BASE_URL.trim_end_matches('/').to_string(),
            emit_events: false,
        }
    }
}

impl fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraConfig")
            .field("username", &self.username)
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("emit_events", &self.emit_events)
            .finish()
    }
}

impl JiraConfig {
    /// Create a configuration, validating every value
    ///
    /// Event emission starts disabled; see [`JiraConfig::with_emit_events`].
    pub fn new(
        username: impl Into<String>,
        api_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> JiraToolResult<Self> {
        let username = username.into();
        let api_token = api_token.into();
        let base_url = base_url.into();

        if username.trim().is_empty() {
            return Err(JiraToolError::config("JIRA username cannot be empty"));
        }
        if api_token.trim().is_empty() {
            return Err(JiraToolError::config("JIRA API token cannot be empty"));
        }
        if base_url.trim().is_empty() {
            return Err(JiraToolError::config(
                "JIRA base URL is required. Set JIRA_URL or configure base_url in TOML file.",
            ));
        }

        let base_url = base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(JiraToolError::config(format!(
                "JIRA base URL must start with http:// or https://. Got: {}",
                base_url
            )));
        }

        Ok(Self {
            username,
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            emit_events: false,
        })
    }

    /// Copy of this configuration with host event emission switched on or off
    pub fn with_emit_events(mut self, emit_events: bool) -> Self {
        self.emit_events = emit_events;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn emit_events(&self) -> bool {
        self.emit_events
    }

    /// Whether any value is still one of the shipped placeholders
    pub fn uses_placeholders(&self) -> bool {
        self.username == DEFAULT_USERNAME
            || self.api_token == DEFAULT_API_TOKEN
            || self.base_url == DEFAULT_BASE_URL.trim_end_matches('/')
    }

    /// Load configuration from environment variables, TOML file, and defaults
    /// Priority: env vars > TOML file > defaults
    pub fn load() -> JiraToolResult<Self> {
        Self::load_from_dir(Path::new("."))
    }

    /// Same as [`JiraConfig::load`], looking for TOML files under `dir`
    pub fn load_from_dir(dir: &Path) -> JiraToolResult<Self> {
        let mut source = match find_config_file(dir) {
            Some(path) => {
                let source = ConfigSource::load_from_file(&path)?;
                info!("Loaded configuration from {}", path.display());
                source
            }
            None => {
                debug!("No TOML configuration file found, using defaults and environment variables");
                ConfigSource::default()
            }
        };

        source.load_from_env();

        source.into_config()
    }
}

impl ConfigSource {
    /// Load configuration values from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> JiraToolResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            JiraToolError::config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// Override values with environment variables
    pub fn load_from_env(&mut self) {
        if let Ok(url) = env::var("JIRA_URL") {
            self.base_url = Some(url);
            debug!("Loaded JIRA_URL from environment");
        }

        if let Ok(username) = env::var("JIRA_USERNAME") {
            self.username = Some(username);
            debug!("Loaded JIRA_USERNAME from environment");
        }

        if let Ok(token) = env::var("JIRA_API_TOKEN") {
            self.api_token = Some(token);
            debug!("Loaded JIRA_API_TOKEN from environment");
        }

        if let Ok(flag) = env::var("JIRA_EMIT_EVENTS") {
            match parse_flag(&flag) {
                Some(enabled) => {
                    self.emit_events = Some(enabled);
                    debug!("Set event emission to {} from environment", enabled);
                }
                None => warn!("Ignoring unrecognised JIRA_EMIT_EVENTS value: {}", flag),
            }
        }
    }

    /// Fill gaps with placeholders and validate
    pub fn into_config(self) -> JiraToolResult<JiraConfig> {
        let config = JiraConfig::new(
            self.username.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            self.api_token.unwrap_or_else(|| DEFAULT_API_TOKEN.to_string()),
            self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )?
        .with_emit_events(self.emit_events.unwrap_or(false));

        if config.uses_placeholders() {
            warn!("JIRA configuration still contains placeholder values; requests will fail until they are replaced");
        }

        info!("Configuration validation successful");
        Ok(config)
    }
}

/// First existing config file under `dir`, in priority order
fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|file| dir.join(file))
        .find(|path| path.exists())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
