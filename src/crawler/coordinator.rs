//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - The frontier queue and visited set
//! - Fetching, text extraction and link discovery
//! - Writing one text file per page
//! - Progress reporting, pacing, page cap and cancellation

use crate::config::{Config, CrawlerConfig};
use crate::crawler::extractor::extract_page;
use crate::crawler::fetcher::{
    FetchError, FetchResponse, FetchedPage, HttpFetcher, PageFetcher, MAX_REDIRECTS,
};
use crate::crawler::frontier::{CrawlTask, Frontier};
use crate::crawler::observer::{CrawlEvent, CrawlObserver};
use crate::output::TextWriter;
use crate::state::{CrawlProgress, PageState};
use crate::url::{normalize_parsed, SiteScope};
use crate::{GleanerError, UrlError};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// How following a task's redirect chain ended
enum Resolved {
    Page(FetchedPage),
    /// The chain reached a URL already fetched in this run
    AlreadyVisited(Url),
}

/// Text of one fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    /// URL the page was requested as
    pub source_url: String,

    /// URL after redirects
    pub final_url: String,

    /// Page title, if the document had one
    pub title: Option<String>,

    /// Extracted visible text
    pub text: String,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,

    /// Link hops from the seed
    pub depth: u32,

    /// File holding the text, once written
    pub saved_path: Option<PathBuf>,
}

/// A task that did not produce a saved page
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlFailure {
    pub url: String,
    pub depth: u32,
    pub state: PageState,
    pub reason: String,
}

/// Everything a crawl run produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Normalized seed URL
    pub seed: String,

    pub max_depth: u32,

    /// One record per successfully fetched page, in fetch order
    pub pages: Vec<PageRecord>,

    /// Fetch and write failures, in the order they happened
    pub failures: Vec<CrawlFailure>,

    /// Final counts
    pub progress: CrawlProgress,

    /// The run was stopped through its cancellation token
    pub cancelled: bool,

    /// The run stopped at the page cap with fetchable work left in the frontier
    pub limit_reached: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    fn new(seed: &str, max_depth: u32) -> Self {
        let now = Utc::now();
        Self {
            seed: seed.to_string(),
            max_depth,
            pages: Vec::new(),
            failures: Vec::new(),
            progress: CrawlProgress::default(),
            cancelled: false,
            limit_reached: false,
            started_at: now,
            finished_at: now,
        }
    }

    /// Paths of every file written during the run
    pub fn saved_paths(&self) -> Vec<&PathBuf> {
        self.pages
            .iter()
            .filter_map(|page| page.saved_path.as_ref())
            .collect()
    }
}

/// Bounded breadth-first crawler
///
/// One crawler can run many crawls; each run owns its own frontier and
/// visited set. Fetches happen strictly one at a time.
pub struct Crawler<F: PageFetcher = HttpFetcher> {
    fetcher: F,
    writer: TextWriter,
    settings: CrawlerConfig,
    cancel: CancellationToken,
}

impl Crawler<HttpFetcher> {
    /// Creates a crawler that fetches over HTTP and writes to the configured output directory
    pub fn from_config(config: &Config) -> Result<Self, GleanerError> {
        let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler)?;
        let writer = TextWriter::new(config.output.output_dir.clone());
        Ok(Self::new(fetcher, writer, config.crawler.clone()))
    }
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, writer: TextWriter, settings: CrawlerConfig) -> Self {
        Self {
            fetcher,
            writer,
            settings,
            cancel: CancellationToken::new(),
        }
    }

    /// Uses an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops the current and future runs when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Crawls from `seed_url`, following same-site links up to `max_depth` hops
    ///
    /// Per-page failures are recorded in the report and never abort the run.
    /// The only error is a seed URL that cannot be used at all.
    ///
    /// # Loop
    ///
    /// 1. Stop on cancellation, or when the page cap is reached
    /// 2. Pop the next task; skip it if visited or deeper than `max_depth`
    /// 3. Wait out the fetch delay, mark the URL visited and fetch it,
    ///    following redirects one hop at a time and stopping at visited targets
    /// 4. Extract text and links, write the text, queue unvisited links at depth + 1
    /// 5. Notify the observer with the outcome and running counts
    pub async fn run(
        &self,
        seed_url: &str,
        max_depth: u32,
        observer: &dyn CrawlObserver,
    ) -> Result<CrawlReport, GleanerError> {
        let seed_url = Url::parse(seed_url.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        let seed = CrawlTask::new(seed_url, 0)?;
        let scope = SiteScope::for_url(&seed.key)?;
        let page_limit = self.settings.page_limit();

        tracing::info!(
            "Starting crawl of {} (max depth {}, site {})",
            seed.url,
            max_depth,
            scope.domain()
        );

        let mut report = CrawlReport::new(seed.key.as_str(), max_depth);
        let mut frontier = Frontier::with_seed(seed);
        let mut last_fetch: Option<Instant> = None;
        let start_time = Instant::now();

        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("Crawl cancelled, {} tasks left", frontier.len());
                report.cancelled = true;
                break;
            }

            if let Some(limit) = page_limit {
                if report.pages.len() >= limit && frontier.has_fetchable(max_depth) {
                    tracing::info!("Page limit ({}) reached", limit);
                    report.limit_reached = true;
                    break;
                }
            }

            let Some(task) = frontier.pop() else {
                tracing::debug!("Frontier is empty");
                break;
            };

            if frontier.is_visited(&task.key) {
                continue;
            }

            if task.depth > max_depth {
                tracing::debug!("Skipping {} at depth {}", task.url, task.depth);
                report.progress.record(PageState::DepthExceeded);
                report.progress.queued = frontier.len();
                let event = CrawlEvent {
                    url: task.url.to_string(),
                    depth: task.depth,
                    state: PageState::DepthExceeded,
                    saved_path: None,
                    message: None,
                    progress: report.progress,
                };
                observer.on_event(&event).await;
                continue;
            }

            self.pace(&mut last_fetch).await;
            if self.cancel.is_cancelled() {
                tracing::info!("Crawl cancelled, {} tasks left", frontier.len() + 1);
                report.cancelled = true;
                break;
            }

            frontier.mark_visited(&task.key);
            let mut event = self
                .process_task(&task, &scope, &mut frontier, &mut report)
                .await;

            report.progress.queued = frontier.len();
            event.progress = report.progress;
            observer.on_event(&event).await;
        }

        report.progress.queued = frontier.len();
        report.finished_at = Utc::now();

        tracing::info!(
            "Crawl completed: {} pages saved, {} failed, {} visited in {:?}",
            report.progress.saved,
            report.progress.failed,
            frontier.visited_count(),
            start_time.elapsed()
        );

        observer.on_complete(&report).await;
        Ok(report)
    }

    /// Fetches, extracts and saves one page, queuing the links it discovers
    async fn process_task(
        &self,
        task: &CrawlTask,
        scope: &SiteScope,
        frontier: &mut Frontier,
        report: &mut CrawlReport,
    ) -> CrawlEvent {
        let url_str = task.url.to_string();
        tracing::debug!("Fetching {} (depth {})", url_str, task.depth);

        let fetched = match self.resolve(task, frontier).await {
            Ok(Resolved::Page(page)) => page,
            Ok(Resolved::AlreadyVisited(target)) => {
                tracing::debug!("{} redirects to already fetched {}", url_str, target);
                report.progress.record(PageState::AlreadyVisited);
                return CrawlEvent {
                    url: url_str,
                    depth: task.depth,
                    state: PageState::AlreadyVisited,
                    saved_path: None,
                    message: Some(format!("redirects to {}", target)),
                    progress: report.progress,
                };
            }
            Err(e) => {
                let state = e.page_state();
                tracing::warn!("Failed to fetch {}: {}", url_str, e);
                report.failures.push(CrawlFailure {
                    url: url_str.clone(),
                    depth: task.depth,
                    state,
                    reason: e.to_string(),
                });
                report.progress.record(state);
                return CrawlEvent {
                    url: url_str,
                    depth: task.depth,
                    state,
                    saved_path: None,
                    message: Some(e.to_string()),
                    progress: report.progress,
                };
            }
        };

        let extracted = extract_page(&fetched.body, &fetched.final_url, scope);
        if extracted.text.is_empty() {
            tracing::debug!("No visible text on {}", url_str);
        }

        let mut queued = 0;
        for link in extracted.links {
            match CrawlTask::new(link, task.depth + 1) {
                Ok(next) => {
                    if frontier.push(next) {
                        queued += 1;
                    }
                }
                Err(e) => tracing::debug!("Dropping link from {}: {}", url_str, e),
            }
        }
        tracing::debug!("Queued {} new links from {}", queued, url_str);

        let mut record = PageRecord {
            source_url: url_str.clone(),
            final_url: fetched.final_url.to_string(),
            title: extracted.title,
            text: extracted.text,
            fetched_at: Utc::now(),
            depth: task.depth,
            saved_path: None,
        };

        let (state, message) = match self.writer.save(&record) {
            Ok(path) => {
                record.saved_path = Some(path);
                (PageState::Saved, None)
            }
            Err(e) => {
                tracing::warn!("Failed to save text of {}: {}", url_str, e);
                report.failures.push(CrawlFailure {
                    url: url_str.clone(),
                    depth: task.depth,
                    state: PageState::WriteFailed,
                    reason: e.to_string(),
                });
                (PageState::WriteFailed, Some(e.to_string()))
            }
        };

        let saved_path = record.saved_path.clone();
        report.pages.push(record);
        report.progress.record(state);

        CrawlEvent {
            url: url_str,
            depth: task.depth,
            state,
            saved_path,
            message,
            progress: report.progress,
        }
    }

    /// Fetches a task, following its redirect chain hop by hop
    ///
    /// Every hop target is marked visited before it is requested, so a page
    /// reached through a redirect is never fetched a second time.
    async fn resolve(
        &self,
        task: &CrawlTask,
        frontier: &mut Frontier,
    ) -> Result<Resolved, FetchError> {
        let mut current = task.url.clone();

        for _ in 0..=MAX_REDIRECTS {
            let mut location = match self.fetcher.fetch(&current).await? {
                FetchResponse::Page(page) => return Ok(Resolved::Page(page)),
                FetchResponse::Redirect { location } => location,
            };
            location.set_fragment(None);

            let key = normalize_parsed(location.clone()).map_err(|e| FetchError::Redirect {
                url: current.to_string(),
                message: e.to_string(),
            })?;
            if !frontier.mark_visited(&key) {
                return Ok(Resolved::AlreadyVisited(location));
            }

            tracing::debug!("{} redirected to {}", current, location);
            current = location;
        }

        Err(FetchError::Redirect {
            url: task.url.to_string(),
            message: format!("more than {} redirects", MAX_REDIRECTS),
        })
    }

    /// Sleeps until the configured delay has passed since the previous fetch
    async fn pace(&self, last_fetch: &mut Option<Instant>) {
        let delay = self.settings.fetch_delay();
        if let Some(last) = *last_fetch {
            let elapsed = last.elapsed();
            if elapsed < delay {
                tokio::select! {
                    _ = tokio::time::sleep(delay - elapsed) => {}
                    _ = self.cancel.cancelled() => {}
                }
            }
        }
        *last_fetch = Some(Instant::now());
    }
}
