//! Progress reporting for crawl runs
//!
//! The crawler notifies a [`CrawlObserver`] after every task, in the order
//! the tasks finished. A bounded `tokio::sync::mpsc::Sender<CrawlEvent>` is
//! an observer too, which is the usual way to feed a UI running elsewhere.

use crate::crawler::CrawlReport;
use crate::state::{CrawlProgress, PageState};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// What happened to one crawl task
#[derive(Debug, Clone)]
pub struct CrawlEvent {
    /// The task URL
    pub url: String,

    /// Link hops from the seed
    pub depth: u32,

    /// Outcome of the task
    pub state: PageState,

    /// File the page text was written to, when saved
    pub saved_path: Option<PathBuf>,

    /// Failure or skip reason, when the task did not save a page
    pub message: Option<String>,

    /// Running counts after this task
    pub progress: CrawlProgress,
}

/// Observer trait for receiving crawl events
///
/// # Example
///
/// ```
/// use gleaner::crawler::{CrawlEvent, CrawlObserver};
///
/// struct PrintObserver;
///
/// #[async_trait::async_trait]
/// impl CrawlObserver for PrintObserver {
///     async fn on_event(&self, event: &CrawlEvent) {
///         println!("{} {}", event.state, event.url);
///     }
/// }
/// ```
#[async_trait]
pub trait CrawlObserver: Send + Sync {
    /// Called after each task, in completion order
    async fn on_event(&self, _event: &CrawlEvent) {}

    /// Called once when the run ends, including cancelled runs
    async fn on_complete(&self, _report: &CrawlReport) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

#[async_trait]
impl CrawlObserver for NoopObserver {}

/// Observer that logs every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

#[async_trait]
impl CrawlObserver for LoggingObserver {
    async fn on_event(&self, event: &CrawlEvent) {
        let p = event.progress;
        match (&event.saved_path, &event.message) {
            (Some(path), _) => tracing::info!(
                "[{}/{} saved, {} queued, {} failed] {} -> {}",
                p.saved,
                p.visited,
                p.queued,
                p.failed,
                event.url,
                path.display()
            ),
            (None, Some(message)) => tracing::warn!(
                "[{}/{} saved, {} queued, {} failed] {} {}: {}",
                p.saved,
                p.visited,
                p.queued,
                p.failed,
                event.state,
                event.url,
                message
            ),
            (None, None) => tracing::debug!("{} {} (depth {})", event.state, event.url, event.depth),
        }
    }

    async fn on_complete(&self, report: &CrawlReport) {
        tracing::info!(
            "Crawl of {} finished: {} pages recorded, {} failures",
            report.seed,
            report.pages.len(),
            report.failures.len()
        );
    }
}

#[async_trait]
impl CrawlObserver for mpsc::Sender<CrawlEvent> {
    async fn on_event(&self, event: &CrawlEvent) {
        // A dropped receiver means nobody is listening any more; the crawl goes on.
        if self.send(event.clone()).await.is_err() {
            tracing::debug!("Progress receiver closed, dropping event for {}", event.url);
        }
    }
}
