//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the terminal outcome of a single crawl task
//! - `CrawlProgress`: running counts reported to observers after every task

mod page_state;
mod progress;

pub use page_state::PageState;
pub use progress::CrawlProgress;
