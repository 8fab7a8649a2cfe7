//! Story service HTTP client
//!
//! Three endpoints, all taking `{"context": <story text>}`:
//! - `POST /extract` answers `{"characters": [...]}`
//! - `POST /suggestions_stream` streams NDJSON events for three slots
//! - `POST /complete_stream` streams NDJSON events for one slot

use std::ops::ControlFlow;

use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::stream::{
    self, COMPLETION_SLOTS, IngestError, SUGGESTION_SLOTS, StreamEvent,
};

pub use crate::stream::IngestSummary;

/// Errors talking to the story service
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection failed or the body could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// Response body was not what the endpoint promises
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}

impl From<IngestError> for ClientError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::Cancelled => ClientError::Cancelled,
            IngestError::Read(message) => ClientError::Network(message),
        }
    }
}

/// Which streaming endpoint to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Suggestions,
    Completion,
}

impl StreamKind {
    pub fn path(self) -> &'static str {
        match self {
            StreamKind::Suggestions => "/suggestions_stream",
            StreamKind::Completion => "/complete_stream",
        }
    }

    /// Number of slots the endpoint addresses
    pub fn slots(self) -> usize {
        match self {
            StreamKind::Suggestions => SUGGESTION_SLOTS,
            StreamKind::Completion => COMPLETION_SLOTS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StreamKind::Suggestions => "Suggestions",
            StreamKind::Completion => "Completion",
        }
    }
}

#[derive(Serialize)]
struct ContextBody<'a> {
    context: &'a str,
}

/// Client for the story service
#[derive(Debug, Clone)]
pub struct StoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Ask the service for candidate character names
    ///
    /// Returns the raw list; non-string and empty entries are dropped, and a
    /// missing or non-array `characters` field yields an empty list.
    pub async fn extract_characters(&self, context: &str) -> Result<Vec<String>, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/extract"))
            .json(&ContextBody { context })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        let names = json
            .get("characters")
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(names)
    }

    /// Open a streaming endpoint and feed its events to `on_event`
    ///
    /// Cancellation is honoured while connecting and before every read.
    /// Returns once the service closes the stream.
    pub async fn stream_with_cancel<F>(
        &self,
        kind: StreamKind,
        context: &str,
        cancel: &CancellationToken,
        on_event: F,
    ) -> Result<IngestSummary, ClientError>
    where
        F: FnMut(StreamEvent) -> ControlFlow<()>,
    {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let request = self
            .http
            .post(self.endpoint(kind.path()))
            .json(&ContextBody { context })
            .send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            response = request => response?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                code: status.as_u16(),
                body,
            });
        }

        log::debug!("{} stream opened ({})", kind.label(), status);
        let summary = stream::drive(response.bytes_stream(), cancel, on_event).await?;
        log::debug!(
            "{} stream ended: {} events, {} malformed",
            kind.label(),
            summary.events,
            summary.malformed
        );
        Ok(summary)
    }
}
