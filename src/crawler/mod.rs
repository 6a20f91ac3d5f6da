//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with redirect handling and error classification
//! - Visible text and link extraction
//! - The frontier queue and visited set
//! - Overall crawl coordination and progress reporting

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod observer;

pub use coordinator::{CrawlFailure, CrawlReport, Crawler, PageRecord};
pub use extractor::{extract, extract_page, ExtractedPage};
pub use fetcher::{
    build_http_client, fetch_url, FetchError, FetchResponse, FetchedPage, HttpFetcher, PageFetcher,
    MAX_REDIRECTS,
};
pub use frontier::{CrawlTask, Frontier};
pub use observer::{CrawlEvent, CrawlObserver, LoggingObserver, NoopObserver};

use crate::config::Config;
use crate::GleanerError;

/// Runs a complete crawl operation with the configured settings
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Fetch the seed and extract its text
/// 3. Follow same-site links breadth-first, up to `max_depth` hops
/// 4. Write one text file per fetched page
///
/// Progress is logged through `tracing`. Use [`Crawler`] directly for a
/// custom observer or cancellation.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed_url` - Where the crawl starts
/// * `max_depth` - Overrides `crawler.max-depth` when given
pub async fn crawl(
    config: &Config,
    seed_url: &str,
    max_depth: Option<u32>,
) -> Result<CrawlReport, GleanerError> {
    let crawler = Crawler::from_config(config)?;
    let depth = max_depth.unwrap_or(config.crawler.max_depth);
    crawler.run(seed_url, depth, &LoggingObserver).await
}
