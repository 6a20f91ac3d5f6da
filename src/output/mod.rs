//! Output module for persisting page text and reporting crawl results
//!
//! This module handles:
//! - Writing one plain text file per crawled page
//! - Deriving collision-free file names from URLs
//! - Printing the end-of-run crawl summary

mod report;
mod writer;

pub use report::{format_report, print_report};
pub use writer::{file_stem_for_url, TextWriter, WriteError};
