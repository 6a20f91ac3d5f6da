//! Human-readable summary of a finished crawl

use crate::crawler::CrawlReport;
use crate::state::PageState;
use std::collections::HashMap;
use std::fmt;

/// Failures listed individually before the rest are elided
const MAX_LISTED_FAILURES: usize = 20;

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = self.progress;
        let duration = (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0;

        writeln!(f, "=== Crawl Summary ===\n")?;

        writeln!(f, "Overview:")?;
        writeln!(f, "  Seed: {}", self.seed)?;
        writeln!(f, "  Max depth: {}", self.max_depth)?;
        writeln!(f, "  Duration: {:.1}s", duration)?;
        writeln!(f, "  Pages fetched: {}", self.pages.len())?;
        writeln!(f, "  Files saved: {}", progress.saved)?;
        writeln!(f, "  Skipped: {}", progress.skipped)?;
        if self.cancelled {
            writeln!(f, "  Stopped: cancelled")?;
        } else if self.limit_reached {
            writeln!(f, "  Stopped: page limit reached")?;
        }
        writeln!(f)?;

        if !self.failures.is_empty() {
            let mut by_state: HashMap<PageState, usize> = HashMap::new();
            for failure in &self.failures {
                *by_state.entry(failure.state).or_insert(0) += 1;
            }

            // Sort states by count (descending), then by name for a stable order
            let mut state_counts: Vec<_> = by_state.into_iter().collect();
            state_counts
                .sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

            writeln!(f, "Error Summary:")?;
            for (state, count) in state_counts {
                writeln!(f, "  {}: {}", state, count)?;
            }
            writeln!(f)?;

            writeln!(f, "Failures ({}):", self.failures.len())?;
            for failure in self.failures.iter().take(MAX_LISTED_FAILURES) {
                writeln!(f, "  - {} ({})", failure.url, failure.reason)?;
            }
            if self.failures.len() > MAX_LISTED_FAILURES {
                writeln!(
                    f,
                    "  ... and {} more",
                    self.failures.len() - MAX_LISTED_FAILURES
                )?;
            }
            writeln!(f)?;
        }

        let attempted = progress.visited;
        let success_rate = if attempted > 0 {
            (progress.saved as f64 / attempted as f64) * 100.0
        } else {
            0.0
        };
        writeln!(
            f,
            "Success Rate: {:.1}% ({} / {} pages saved)",
            success_rate, progress.saved, attempted
        )
    }
}

/// Renders the crawl summary printed at the end of a run
pub fn format_report(report: &CrawlReport) -> String {
    report.to_string()
}

/// Prints the crawl summary to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", report);
}
