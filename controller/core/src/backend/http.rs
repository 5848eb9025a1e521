//! HTTP Text-Processing Backend
//!
//! Talks to the endpoint over JSON/HTTP:
//!
//! - `POST {base}/api/process` with `{"text": ...}`
//! - `GET {base}/api/status` for health
//!
//! Error responses carry `{"error": "..."}`; that message is surfaced in
//! [`ProcessingError::Status`] for diagnostics.

use async_trait::async_trait;

use super::traits::{EndpointStatus, ProcessRequest, ProcessedText, ProcessingError, TextProcessor};
use crate::config::EndpointConfig;

/// Reqwest-backed processor
#[derive(Clone, Debug)]
pub struct HttpTextProcessor {
    process_url: String,
    status_url: String,
    http_client: reqwest::Client,
}

impl HttpTextProcessor {
    /// Build a client for the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::Network`] if the HTTP client cannot be
    /// constructed (e.g. TLS backend initialization failure).
    pub fn new(endpoint: &EndpointConfig) -> Result<Self, ProcessingError> {
        let http_client = reqwest::Client::builder()
            .timeout(endpoint.request_timeout())
            .build()?;
        Ok(Self {
            process_url: endpoint.process_url(),
            status_url: endpoint.status_url(),
            http_client,
        })
    }

    /// Processing URL
    #[must_use]
    pub fn process_url(&self) -> &str {
        &self.process_url
    }

    /// Turn a non-2xx response into a status error
    async fn status_error(response: reqwest::Response) -> ProcessingError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ProcessingError::Status {
            status,
            message: error_message(&body),
        }
    }
}

/// Prefer the endpoint's `error` field, fall back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl TextProcessor for HttpTextProcessor {
    fn name(&self) -> &str {
        "http"
    }

    async fn process(&self, text: &str) -> Result<ProcessedText, ProcessingError> {
        let response = self
            .http_client
            .post(&self.process_url)
            .json(&ProcessRequest {
                text: text.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProcessingError::Malformed(e.to_string()))
    }

    async fn status(&self) -> Result<EndpointStatus, ProcessingError> {
        let response = self.http_client.get(&self.status_url).send().await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProcessingError::Malformed(e.to_string()))
    }
}
