//! Quick analysis of a saved page: sentiment, keywords and a summary

mod keywords;
mod sentiment;

pub use keywords::keyword_density;
pub use sentiment::{sentiment_details, sentiment_details_for, sentiment_label, sentiment_weight};

use crate::summarizer::{SummarizerClient, SummaryOptions, SummaryResponse};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Texts shorter than this (in characters) are not sent to the model
pub const MIN_SUMMARY_CHARS: usize = 100;

/// Keywords reported per file
pub const TOP_KEYWORDS: usize = 5;

/// Summary used for texts below [`MIN_SUMMARY_CHARS`]
pub const TOO_SHORT_SUMMARY: &str = "Text too short to summarize.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("File does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File is empty: {}", .0.display())]
    Empty(PathBuf),
}

/// Everything reported for one file
#[derive(Debug, Clone)]
pub struct Analysis {
    pub file_name: String,
    pub sentiment_score: i64,
    /// Label and score, as from [`sentiment_details_for`]
    pub sentiment: String,
    pub keywords: Vec<String>,
    pub summary: SummaryResponse,
}

/// Analyzes a saved text file
///
/// A failed summary does not fail the analysis; it shows up as an error
/// status in [`Analysis::summary`].
pub async fn analyze_file(
    client: &SummarizerClient,
    path: &Path,
    options: &SummaryOptions,
) -> Result<Analysis, AnalysisError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(AnalysisError::NotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(AnalysisError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if text.trim().is_empty() {
        return Err(AnalysisError::Empty(path.to_path_buf()));
    }

    let sentiment_score = sentiment_weight(&text);
    let keywords = keyword_density(&text, TOP_KEYWORDS);

    let summary = if text.chars().count() < MIN_SUMMARY_CHARS {
        SummaryResponse::success(TOO_SHORT_SUMMARY, None)
    } else {
        client.summarize(&text, options).await
    };

    Ok(Analysis {
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        sentiment_score,
        sentiment: sentiment_details_for(sentiment_score),
        keywords,
        summary,
    })
}
