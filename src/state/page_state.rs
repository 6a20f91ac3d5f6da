//! Page state definitions for crawl outcomes
//!
//! Every task taken off the frontier ends in exactly one of these states.

use std::fmt;

/// Terminal outcome of one crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Success =====
    /// Page was fetched, extracted and its text written to disk
    Saved,

    // ===== Fetch failures =====
    /// Page returned HTTP 404 or 410
    DeadLink,

    /// Page returned another non-2xx status
    HttpError,

    /// Host could not be reached (DNS failure, connection refused, TLS error)
    Unreachable,

    /// Request did not complete within the configured timeout
    Timeout,

    /// Content-Type is present and is not HTML
    ContentMismatch,

    /// Request or body read failed for another reason
    Failed,

    // ===== Post-fetch failures =====
    /// Page was extracted but its text could not be written
    WriteFailed,

    // ===== Skips =====
    /// Task lies beyond the maximum crawl depth and was never fetched
    DepthExceeded,

    /// Task redirected to a page already fetched in this run
    AlreadyVisited,
}

impl PageState {
    /// Returns true if the page text reached disk
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved)
    }

    /// Returns true if the page was never fetched
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::DepthExceeded | Self::AlreadyVisited)
    }

    /// Returns true if fetching or saving the page failed
    pub fn is_error(&self) -> bool {
        !self.is_success() && !self.is_skipped()
    }

    /// Returns true if the page was fetched successfully, whether or not it was saved
    pub fn was_fetched(&self) -> bool {
        matches!(self, Self::Saved | Self::WriteFailed)
    }

    /// Short machine-friendly name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::DeadLink => "dead_link",
            Self::HttpError => "http_error",
            Self::Unreachable => "unreachable",
            Self::Timeout => "timeout",
            Self::ContentMismatch => "content_mismatch",
            Self::Failed => "failed",
            Self::WriteFailed => "write_failed",
            Self::DepthExceeded => "depth_exceeded",
            Self::AlreadyVisited => "already_visited",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
