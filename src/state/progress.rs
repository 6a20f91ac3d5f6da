use crate::state::PageState;

/// Running counts for one crawl run
///
/// `queued` is the current frontier length; the other counters only grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlProgress {
    /// URLs that were fetched (or attempted)
    pub visited: usize,

    /// Tasks waiting in the frontier
    pub queued: usize,

    /// Tasks that ended in an error state
    pub failed: usize,

    /// Pages whose text was written to disk
    pub saved: usize,

    /// Tasks dropped without fetching a page (too deep, or redirected to a visited page)
    pub skipped: usize,
}

impl CrawlProgress {
    /// Accounts for one finished task
    pub fn record(&mut self, state: PageState) {
        if state.is_skipped() {
            self.skipped += 1;
            return;
        }

        self.visited += 1;
        if state.is_success() {
            self.saved += 1;
        } else {
            self.failed += 1;
        }
    }
}
