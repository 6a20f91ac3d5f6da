//! Browsing the directory of saved page text
//!
//! Saved pages are plain `.txt` files, so the library is just the output
//! directory. Nothing here writes to it.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading the output directory
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Search keyword must not be empty")]
    EmptyKeyword,

    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One saved text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFileInfo {
    /// File name including the `.txt` extension
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Lists the `.txt` files in `dir`, sorted by name
///
/// A directory that does not exist yet simply has no files.
pub fn list_saved_files(dir: &Path) -> Result<Vec<SavedFileInfo>, LibraryError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(LibraryError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LibraryError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        files.push(SavedFileInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            size_bytes: metadata.len(),
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Names of saved files whose text contains `keyword`, ignoring case
///
/// Files that cannot be read as UTF-8 are skipped.
pub fn search_saved_files(dir: &Path, keyword: &str) -> Result<Vec<String>, LibraryError> {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return Err(LibraryError::EmptyKeyword);
    }

    let mut matches = Vec::new();
    for file in list_saved_files(dir)? {
        match std::fs::read_to_string(&file.path) {
            Ok(text) if text.to_lowercase().contains(&needle) => matches.push(file.name),
            Ok(_) => {}
            Err(e) => tracing::debug!("Skipping {}: {}", file.path.display(), e),
        }
    }

    Ok(matches)
}
