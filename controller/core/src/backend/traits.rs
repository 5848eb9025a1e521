//! Text-Processing Backend Traits
//!
//! Wire types for the endpoint and the trait every backend implements.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request body: `{"text": "..."}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// Raw input text, untrimmed
    pub text: String,
}

/// Successful response body
///
/// Only `original_text` and `processed_text` are required; the endpoint
/// also reports the input length and a server timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedText {
    /// Echo of the submitted text
    pub original_text: String,
    /// The transformed text
    pub processed_text: String,
    /// Input length in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Server-side completion time (ISO-8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ProcessedText {
    /// Response with only the required fields
    pub fn new(original: impl Into<String>, processed: impl Into<String>) -> Self {
        Self {
            original_text: original.into(),
            processed_text: processed.into(),
            length: None,
            timestamp: None,
        }
    }

    /// Two-line rendering for the output region
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "Original: {}\nProcessed: {}",
            self.original_text, self.processed_text
        )
    }
}

/// Health report from the status route
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointStatus {
    /// Service state, `running` when healthy
    pub status: String,
    /// Service version
    #[serde(default)]
    pub version: Option<String>,
    /// Routes the service exposes
    #[serde(default)]
    pub endpoints: Vec<String>,
}

/// Why a processing request failed
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Connection refused, timeout, or another transport failure
    #[error("Request failed: {0}")]
    Network(String),

    /// Non-2xx response; `message` is the endpoint's `error` field or raw body
    #[error("Endpoint returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error detail from the endpoint
        message: String,
    },

    /// 2xx response whose body is not the expected JSON
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The backend call panicked or was cancelled before answering
    #[error("Processing did not complete: {0}")]
    Aborted(String),
}

impl From<reqwest::Error> for ProcessingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Text-processing backend
#[async_trait]
pub trait TextProcessor: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Send one text for processing
    async fn process(&self, text: &str) -> Result<ProcessedText, ProcessingError>;

    /// Query the backend's health route
    async fn status(&self) -> Result<EndpointStatus, ProcessingError>;

    /// Whether the backend reports itself as running
    async fn health_check(&self) -> bool {
        matches!(self.status().await, Ok(status) if status.status == "running")
    }
}
