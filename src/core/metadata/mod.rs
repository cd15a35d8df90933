//! # Metadata Module
//!
//! File-level metadata for audit fields in comparison records.

use crate::error::CompareError;
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

/// Last-modification timestamp of a file, formatted as an absolute
/// local date-time string (`YYYY-MM-DD HH:MM:SS`).
pub fn modification_timestamp(path: &Path) -> Result<String, CompareError> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| CompareError::Metadata {
            path: path.to_path_buf(),
            source: e,
        })?;

    let local: DateTime<Local> = modified.into();
    Ok(local.format("%Y-%m-%d %H:%M:%S").to_string())
}
