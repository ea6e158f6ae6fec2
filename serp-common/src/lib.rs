//! Shared types for the serp workspace.
//!
//! Everything a tool and its host agree on lives here, so the tool crates and
//! the binary can depend on it without pulling in the HTTP stack.
//!
//! # Overview
//!
//! - [`ToolMessage`]: one unit of tool output (advisory/error text or a JSON payload)
//! - [`Tool`]: the invocation contract a plugin host drives
//! - [`Credentials`]: secrets injected by the host, never part of caller parameters
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`SerpError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use serp_common::{Credentials, ToolMessage};
//!
//! let creds = Credentials::new().with("serpapi_api_key", "secret");
//! assert_eq!(creds.get("serpapi_api_key"), Some("secret"));
//!
//! let msg = ToolMessage::text("hello");
//! assert_eq!(msg.as_text(), Some("hello"));
//! ```
use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod observability;

/// Parameters as handed over by the host: a JSON object keyed by parameter name.
pub type ToolParameters = Map<String, Value>;

/// A single message yielded by a tool invocation.
///
/// Serialises as `{"type": "text", "message": "..."}` or
/// `{"type": "json", "message": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message", rename_all = "lowercase")]
pub enum ToolMessage {
    /// Human-readable text (advisories and error reports).
    Text(String),
    /// Structured payload (the successful result).
    Json(Value),
}

impl ToolMessage {
    pub fn text(message: impl Into<String>) -> Self {
        Self::Text(message.into())
    }

    pub fn json(value: Value) -> Self {
        Self::Json(value)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }
}

/// Secrets supplied by the hosting environment.
///
/// `Debug` never prints values.
#[derive(Clone, Default)]
pub struct Credentials {
    values: BTreeMap<String, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("names", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The contract between a plugin host and a tool.
///
/// `invoke` never fails: every problem is reported as a [`ToolMessage::Text`]
/// so the host only ever sees a sequence of messages.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable identifier the host registers the tool under.
    fn name(&self) -> &str;

    /// Short description shown to users and models.
    fn description(&self) -> &str;

    /// JSON Schema describing the accepted parameters.
    fn parameters_schema(&self) -> Value;

    /// Run the tool once and collect everything it yields, in order.
    async fn invoke(&self, credentials: &Credentials, parameters: &ToolParameters)
        -> Vec<ToolMessage>;
}

/// Error types used across the serp workspace.
#[derive(thiserror::Error, Debug)]
pub enum SerpError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A provider or tool check failed.
    #[error("Tool error: {0}")]
    Tool(String),
}

/// Convenient alias for results that use [`SerpError`].
pub type Result<T> = std::result::Result<T, SerpError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages_serialise_tagged() {
        let text = serde_json::to_value(ToolMessage::text("hi")).unwrap();
        assert_eq!(text, json!({"type": "text", "message": "hi"}));

        let payload = serde_json::to_value(ToolMessage::json(json!({"a": 1}))).unwrap();
        assert_eq!(payload, json!({"type": "json", "message": {"a": 1}}));
    }

    #[test]
    fn credentials_debug_hides_values() {
        let creds = Credentials::new().with("serpapi_api_key", "super-secret");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("serpapi_api_key"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn accessors_match_variant() {
        let m = ToolMessage::json(json!([]));
        assert!(m.as_text().is_none());
        assert_eq!(m.as_json(), Some(&json!([])));
    }
}
