//! Summary request and response types, plus the wire format spoken to the server

use crate::config::SummarizerConfig;
use serde::{Deserialize, Serialize};

// =============================================================================
// Public types
// =============================================================================

/// Model parameters for one summary
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOptions {
    /// Model name as the server knows it
    pub model: String,

    /// Upper bound on generated tokens
    pub max_tokens: u32,

    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f32,

    /// Requested summary length, in words
    pub min_words: u32,
    pub max_words: u32,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        SummarizerConfig::default().default_options()
    }
}

/// Text to summarize together with the options to use
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub text: String,
    pub options: SummaryOptions,
}

impl SummaryRequest {
    pub fn new(text: impl Into<String>, options: SummaryOptions) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }

    /// The instruction sent to the model
    pub fn prompt(&self) -> String {
        format!(
            "Summarize the following text clearly and concisely.\nAim for {}-{} words.\n\nText:\n{}",
            self.options.min_words, self.options.max_words, self.text
        )
    }

    pub(crate) fn to_chat_request(&self) -> ChatRequest {
        ChatRequest {
            model: self.options.model.clone(),
            messages: vec![Message::user(self.prompt())],
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        }
    }
}

/// Whether a summary was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStatus {
    Success,
    Error,
}

/// Outcome of a summary request
///
/// Failures are values too: `status` is `Error` and `error` says why.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResponse {
    /// Generated summary; empty on failure
    pub summary: String,

    pub status: SummaryStatus,

    /// Server reply as JSON, when one was received and parsed
    pub raw: Option<serde_json::Value>,

    /// Human-readable failure reason
    pub error: Option<String>,
}

impl SummaryResponse {
    pub fn success(summary: impl Into<String>, raw: Option<serde_json::Value>) -> Self {
        Self {
            summary: summary.into(),
            status: SummaryStatus::Success,
            raw,
            error: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            summary: String::new(),
            status: SummaryStatus::Error,
            raw: None,
            error: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SummaryStatus::Success
    }
}

// =============================================================================
// Wire format (OpenAI-compatible chat completion)
// =============================================================================

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Message {
    /// Role: "system", "user", "assistant"
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The parts of a completion reply we read
///
/// Chat servers answer with `choices[].message.content`, plain completion
/// servers with `choices[].text`.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseRaw {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,

    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl Choice {
    /// Generated text, preferring the chat form
    pub fn content(self) -> Option<String> {
        self.message
            .and_then(|m| m.content)
            .or(self.text)
    }
}
