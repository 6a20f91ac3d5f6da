//! Gleaner: a text harvester for the web
//!
//! This crate fetches web pages, keeps their visible text as plain text files,
//! follows same-site links to a bounded depth, and asks a locally hosted
//! language model server for summaries of what it saved.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod library;
pub mod output;
pub mod state;
pub mod summarizer;
pub mod url;

use thiserror::Error;

/// Main error type for Gleaner operations
#[derive(Debug, Error)]
pub enum GleanerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Write error: {0}")]
    Write(#[from] output::WriteError),

    #[error("Library error: {0}")]
    Library(#[from] library::LibraryError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] analysis::AnalysisError),

    #[error("Summarizer error: {0}")]
    Summarizer(#[from] summarizer::SummarizerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Gleaner operations
pub type Result<T> = std::result::Result<T, GleanerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler, PageRecord};
pub use state::{CrawlProgress, PageState};
pub use summarizer::{SummarizerClient, SummaryOptions, SummaryResponse, SummaryStatus};
pub use crate::url::{normalize_url, SiteScope};
