//! Frontier queue and visited set for a single crawl run
//!
//! Tasks are served first-in first-out, so the crawl proceeds breadth-first
//! and every URL is first queued at its smallest depth.

use crate::url::normalize_parsed;
use crate::UrlError;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched, with its distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// URL as discovered (fragment removed); this is what gets requested
    pub url: Url,

    /// Normalized form of `url`, used for queued and visited membership
    pub key: Url,

    /// Number of link hops from the seed URL
    pub depth: u32,
}

impl CrawlTask {
    /// Creates a task, rejecting URLs that cannot be normalized
    pub fn new(mut url: Url, depth: u32) -> Result<Self, UrlError> {
        url.set_fragment(None);
        let key = normalize_parsed(url.clone())?;
        Ok(Self { url, key, depth })
    }
}

/// Queue of pending tasks plus the set of URLs already fetched
///
/// Owned by one crawl run and dropped with it. URLs are compared by their
/// normalized string form.
#[derive(Debug, Default)]
pub struct Frontier {
    /// Tasks in discovery order
    queue: VecDeque<CrawlTask>,

    /// Every URL ever queued, so a page linked many times is queued once
    queued: HashSet<String>,

    /// URLs already fetched in this run
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding the seed task
    pub fn with_seed(seed: CrawlTask) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed);
        frontier
    }

    /// Queues a task unless its URL was already queued or visited
    ///
    /// Returns true if the task was added.
    pub fn push(&mut self, task: CrawlTask) -> bool {
        let key = task.key.as_str();
        if self.visited.contains(key) || self.queued.contains(key) {
            return false;
        }

        self.queued.insert(key.to_string());
        self.queue.push_back(task);
        true
    }

    /// Takes the oldest pending task
    pub fn pop(&mut self) -> Option<CrawlTask> {
        self.queue.pop_front()
    }

    /// Records a normalized URL as fetched
    ///
    /// Returns false if it had already been visited.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    /// Returns whether the normalized URL was already fetched in this run
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Returns whether an unvisited task at or above `max_depth` is still queued
    pub fn has_fetchable(&self, max_depth: u32) -> bool {
        self.queue
            .iter()
            .any(|task| task.depth <= max_depth && !self.visited.contains(task.key.as_str()))
    }

    /// Number of tasks waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of distinct URLs fetched so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
