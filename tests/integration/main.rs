//! Integration tests for Gleaner
//!
//! These tests use wiremock to stand in for websites and for the
//! summarization server, and tempfile for output directories.

mod crawl_tests;
mod summarize_tests;
