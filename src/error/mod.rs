//! # Error Module
//!
//! Error types for the media archiver.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-file errors stay per-file** - only index corruption and bad
//!   configuration may abort a whole run

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Copy error: {0}")]
    Copy(#[from] CopyError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while scanning the source tree
///
/// Unreadable entries inside the tree are logged and skipped, not
/// surfaced; only a missing root is an error.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },
}

/// Errors that occur while fingerprinting file contents
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur with the fingerprint index
#[derive(Error, Debug)]
pub enum IndexError {
    #[error(
        "Archive at {path} is inconsistent: index holds {indexed} fingerprints \
         but {live} files are present. The archive may have been modified \
         externally or a previous run was interrupted mid-write."
    )]
    Inconsistent {
        path: PathBuf,
        indexed: usize,
        live: usize,
    },

    #[error("Failed to walk archive {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to write index file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that occur while placing a file into the archive
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("Failed to create bucket directory {path}: {source}")]
    CreateBucket {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {source_path} to {dest_path}: {source}")]
    Copy {
        source_path: PathBuf,
        dest_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete source file {path}: {source}")]
    DeleteSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ArchiveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/vacation"));
    }

    #[test]
    fn inconsistent_error_reports_both_counts() {
        let error = IndexError::Inconsistent {
            path: PathBuf::from("/archive"),
            indexed: 10,
            live: 12,
        };
        let message = error.to_string();
        assert!(message.contains("10"));
        assert!(message.contains("12"));
        assert!(message.contains("/archive"));
    }

    #[test]
    fn copy_error_includes_both_paths() {
        let error = CopyError::Copy {
            source_path: PathBuf::from("/src/a.jpg"),
            dest_path: PathBuf::from("/dest/20230105/a.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let message = error.to_string();
        assert!(message.contains("/src/a.jpg"));
        assert!(message.contains("20230105"));
    }
}
