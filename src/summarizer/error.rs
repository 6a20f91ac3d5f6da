//! Error types for the summarizer client.

use std::time::Duration;
use thiserror::Error;

/// Why a summary could not be produced
///
/// These never escape [`SummarizerClient::summarize`](super::SummarizerClient::summarize),
/// which turns them into an error [`SummaryResponse`](super::SummaryResponse).
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// Client could not be built (bad endpoint, TLS backend)
    #[error("Summarizer configuration error: {0}")]
    Config(String),

    /// Server not running or not listening on the configured port
    #[error("Summarizer server unreachable at {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("Summarizer did not answer within {timeout:?}")]
    Timeout { timeout: Duration },

    /// Non-2xx reply
    #[error("Summarizer returned HTTP {status}: {body}")]
    BadStatus { status: u16, body: String },

    /// Reply body is not JSON
    #[error("Summarizer reply is not valid JSON: {0}")]
    InvalidJson(String),

    /// Reply is JSON but carries no generated text
    #[error("Unexpected summarizer reply: {0}")]
    UnexpectedShape(String),

    /// Any other transport failure
    #[error("Summarizer request failed: {0}")]
    Request(String),
}
