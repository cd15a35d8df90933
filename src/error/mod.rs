//! # Error Module
//!
//! Error types for the image comparator.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Fail loudly** - an unreadable image aborts the batch rather than
//!   being reported as "0% similar"

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Failed to read metadata for {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while decoding an image file
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to open image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Image is empty: {path}")]
    EmptyImage { path: PathBuf },
}

/// Errors that occur while persisting rendered match visualizations
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output image {path}: {reason}")]
    WriteImage { path: PathBuf, reason: String },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, CompareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_includes_path() {
        let error = DecodeError::Malformed {
            path: PathBuf::from("/images/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/images/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }

    #[test]
    fn missing_file_error_includes_path() {
        let error = DecodeError::FileNotFound {
            path: PathBuf::from("/images/missing.png"),
        };
        assert!(error.to_string().contains("/images/missing.png"));
    }

    #[test]
    fn output_error_includes_directory() {
        let error = OutputError::CreateDir {
            path: PathBuf::from("/readonly/out"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("/readonly/out"));
    }
}
