use crate::summarizer::SummaryOptions;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Gleaner
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub summarizer: SummarizerConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Default number of link hops to follow from the seed URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Pause between consecutive fetches (seconds)
    #[serde(rename = "fetch-delay-seconds")]
    pub fetch_delay_seconds: f64,

    /// Maximum number of pages recorded per run (0 disables the cap)
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Overall timeout for a single page request (seconds)
    #[serde(rename = "request-timeout-seconds")]
    pub request_timeout_seconds: u64,
}

impl CrawlerConfig {
    /// Delay slept between fetches
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_secs_f64(self.fetch_delay_seconds.max(0.0))
    }

    /// Page cap, `None` when unlimited
    pub fn page_limit(&self) -> Option<usize> {
        (self.max_pages > 0).then_some(self.max_pages as usize)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            fetch_delay_seconds: 1.0,
            max_pages: 50,
            request_timeout_seconds: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "Gleaner".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives one text file per crawled page
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("scraped_txt"),
        }
    }
}

/// Local model server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub host: String,

    pub port: u16,

    /// Path of the chat completion endpoint on the server
    pub endpoint: String,

    /// Model name passed through to the server
    pub model: String,

    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    pub temperature: f32,

    /// Lower bound of the requested summary length (words)
    #[serde(rename = "min-words")]
    pub min_words: u32,

    /// Upper bound of the requested summary length (words)
    #[serde(rename = "max-words")]
    pub max_words: u32,

    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,
}

impl SummarizerConfig {
    /// Full URL of the completion endpoint
    pub fn endpoint_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.endpoint)
    }

    /// Request options derived from this configuration
    pub fn default_options(&self) -> SummaryOptions {
        SummaryOptions {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            min_words: self.min_words,
            max_words: self.max_words,
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 1234,
            endpoint: "/v1/chat/completions".to_string(),
            model: "qwen2.5-coder-14b".to_string(),
            max_tokens: 512,
            temperature: 0.2,
            min_words: 60,
            max_words: 200,
            timeout_seconds: 120,
        }
    }
}
