//! Summarizer HTTP client and reply parsing

use super::error::SummarizerError;
use super::types::{ChatResponseRaw, SummaryOptions, SummaryRequest, SummaryResponse};
use crate::config::SummarizerConfig;
use reqwest::Client;
use std::path::Path;
use std::time::{Duration, Instant};

/// Longest slice of an error body kept in messages
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for a local OpenAI-compatible completion server
#[derive(Debug, Clone)]
pub struct SummarizerClient {
    http_client: Client,
    endpoint_url: String,
    timeout: Duration,
}

impl SummarizerClient {
    /// Creates a client for the configured host, port and endpoint
    pub fn new(config: &SummarizerConfig) -> Result<Self, SummarizerError> {
        Self::with_endpoint(
            config.endpoint_url(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Creates a client for a full endpoint URL
    pub fn with_endpoint(
        endpoint_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SummarizerError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummarizerError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint_url: endpoint_url.into(),
            timeout,
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Summarizes `text`
    ///
    /// Never fails: an unreachable server, a timeout or an unusable reply
    /// all come back as a response with status `Error` and a reason.
    pub async fn summarize(&self, text: &str, options: &SummaryOptions) -> SummaryResponse {
        let request = SummaryRequest::new(text, options.clone());
        match self.try_summarize(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Summary request failed: {}", e);
                SummaryResponse::failure(e.to_string())
            }
        }
    }

    /// Reads a saved text file and summarizes its contents
    pub async fn summarize_file(&self, path: &Path, options: &SummaryOptions) -> SummaryResponse {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                return SummaryResponse::failure(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                ))
            }
        };

        if text.trim().is_empty() {
            return SummaryResponse::failure(format!("{} is empty", path.display()));
        }

        self.summarize(&text, options).await
    }

    /// Sends one request, surfacing failures as [`SummarizerError`]
    pub async fn try_summarize(
        &self,
        request: &SummaryRequest,
    ) -> Result<SummaryResponse, SummarizerError> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(&self.endpoint_url)
            .json(&request.to_chat_request())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(SummarizerError::BadStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let raw: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| SummarizerError::InvalidJson(e.to_string()))?;
        let summary = parse_summary(&raw)?;

        tracing::debug!(
            model = %request.options.model,
            duration_ms = start.elapsed().as_millis(),
            "Summary received"
        );

        Ok(SummaryResponse::success(summary, Some(raw)))
    }

    fn classify(&self, error: reqwest::Error) -> SummarizerError {
        if error.is_timeout() {
            SummarizerError::Timeout {
                timeout: self.timeout,
            }
        } else if error.is_connect() {
            SummarizerError::Unreachable {
                url: self.endpoint_url.clone(),
                message: error.to_string(),
            }
        } else {
            SummarizerError::Request(error.to_string())
        }
    }
}

/// Pulls the trimmed summary out of a completion reply
fn parse_summary(raw: &serde_json::Value) -> Result<String, SummarizerError> {
    let parsed: ChatResponseRaw = serde_json::from_value(raw.clone())
        .map_err(|e| SummarizerError::UnexpectedShape(e.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| SummarizerError::UnexpectedShape("reply has no choices".into()))?
        .content()
        .ok_or_else(|| {
            SummarizerError::UnexpectedShape("first choice has no message content or text".into())
        })?;

    let summary = content.trim();
    if summary.is_empty() {
        return Err(SummarizerError::UnexpectedShape("summary is empty".into()));
    }

    Ok(summary.to_string())
}
