//! Plain text file writer for crawled pages
//!
//! Each page becomes one UTF-8 file in the output directory, holding exactly
//! the extracted text. Names derive from the page URL; a name already on
//! disk is never reused.

use crate::crawler::PageRecord;
use sha2::{Digest, Sha256};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use url::Url;

/// Longest file stem, in characters, before the extension
const MAX_STEM_CHARS: usize = 100;

/// Numbered suffixes tried after the hashed name is taken
const MAX_NUMBERED_SUFFIX: u32 = 999;

/// Errors from writing page text to disk
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No free file name left for {stem}")]
    Exhausted { stem: String },
}

/// Writes page text into one directory
#[derive(Debug, Clone)]
pub struct TextWriter {
    output_dir: PathBuf,
}

impl TextWriter {
    /// The directory is created on the first save, not here
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Saves a page's text, returning the path of the new file
    pub fn save(&self, record: &PageRecord) -> Result<PathBuf, WriteError> {
        self.save_text(&record.source_url, &record.text)
    }

    /// Saves `text` under a name derived from `url`
    ///
    /// The text goes to a temporary file in the output directory first and is
    /// then linked into place without replacing anything, so a reader never
    /// sees a half-written file and an existing file is never overwritten.
    pub fn save_text(&self, url: &str, text: &str) -> Result<PathBuf, WriteError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| WriteError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let io_error = |source| WriteError::Io {
            path: self.output_dir.clone(),
            source,
        };
        let mut temp = NamedTempFile::new_in(&self.output_dir).map_err(io_error)?;
        temp.write_all(text.as_bytes()).map_err(io_error)?;
        temp.flush().map_err(io_error)?;

        let stem = file_stem_for_url(url);
        for candidate in candidate_names(&stem, url) {
            let path = self.output_dir.join(candidate);
            if path.exists() {
                continue;
            }

            match temp.persist_noclobber(&path) {
                Ok(_) => {
                    tracing::debug!("Wrote {} bytes to {}", text.len(), path.display());
                    return Ok(path);
                }
                // Lost a race for this name; try the next one
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => temp = e.file,
                Err(e) => {
                    return Err(WriteError::Io {
                        path,
                        source: e.error,
                    })
                }
            }
        }

        Err(WriteError::Exhausted { stem })
    }
}

/// Derives the file stem for a URL: `<host>_<path>`, or `<host>_index` for the root
///
/// Characters other than ASCII letters, digits, space, `-`, `_` and `.` become
/// `_`, and the result is cut to 100 characters.
///
/// # Examples
///
/// ```
/// use gleaner::output::file_stem_for_url;
///
/// assert_eq!(file_stem_for_url("https://example.com/"), "example.com_index");
/// assert_eq!(file_stem_for_url("https://example.com/docs/intro"), "example.com_docs_intro");
/// ```
pub fn file_stem_for_url(url: &str) -> String {
    let raw = match Url::parse(url) {
        Ok(parsed) => {
            let mut host = parsed.host_str().unwrap_or("page").to_string();
            if let Some(port) = parsed.port() {
                host = format!("{}:{}", host, port);
            }

            let mut path = parsed.path().trim_matches('/').to_string();
            if let Some(query) = parsed.query() {
                path = format!("{}?{}", path, query);
            }
            if path.is_empty() {
                path = "index".to_string();
            }

            format!("{}_{}", host, path)
        }
        Err(_) => url.to_string(),
    };

    sanitize(&raw)
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STEM_CHARS)
        .collect()
}

/// File names to try, in order: the plain stem, then with a URL hash, then numbered
fn candidate_names(stem: &str, url: &str) -> impl Iterator<Item = String> {
    let digest = hex::encode(Sha256::digest(url.as_bytes()));
    let hashed = format!("{}-{}", stem, &digest[..8]);

    std::iter::once(format!("{}.txt", stem))
        .chain(std::iter::once(format!("{}.txt", hashed)))
        .chain((2..=MAX_NUMBERED_SUFFIX).map(move |n| format!("{}-{}.txt", hashed, n)))
}
