//! Source-file enumeration.
//!
//! Walks each configured source path in insertion order and keeps the files
//! whose names match that entry's glob filter. SQL script trees come from a
//! Windows-cultured toolchain, so filename matching is case-insensitive.

use std::path::PathBuf;

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::config::SourcePathEntry;
use crate::error::Dir2DacError;

/// Enumerate script files for all source path entries, in entry order;
/// within one entry the walk is sorted by file name for determinism.
pub fn enumerate_sql_files(entries: &[SourcePathEntry]) -> Result<Vec<PathBuf>, Dir2DacError> {
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    let mut files = Vec::new();
    for entry in entries {
        let pattern =
            Pattern::new(&entry.filter).map_err(|e| Dir2DacError::InvalidFilterError {
                pattern: entry.filter.clone(),
                source: e,
            })?;

        for dirent in WalkDir::new(&entry.path).sort_by_file_name() {
            let dirent = dirent.map_err(|e| Dir2DacError::SourcePathError {
                path: entry.path.clone(),
                source: e,
            })?;
            if !dirent.file_type().is_file() {
                continue;
            }
            let Some(name) = dirent.file_name().to_str() else {
                continue;
            };
            if pattern.matches_with(name, options) {
                files.push(dirent.into_path());
            }
        }
    }

    Ok(files)
}
