//! # Scanner Module
//!
//! Discovers candidate files in the source tree.
//!
//! The scanner yields a lazy, restartable walk over every file whose
//! extension is in the configured set, recursing into all subdirectories.
//! It also offers a census pass that partitions the distinct extensions
//! present under the root into recognized and other, purely for
//! reporting.

use crate::core::filetype::{self, FileTypeSet};
use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Enumerates candidate files under a source root
pub struct SourceScanner {
    root: PathBuf,
    types: FileTypeSet,
}

/// The distinct extensions found under a source root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionCensus {
    /// Extensions present and in the configured set
    pub recognized: BTreeSet<String>,
    /// Extensions present but not configured for archiving
    pub other: BTreeSet<String>,
}

impl SourceScanner {
    pub fn new(root: &Path, types: FileTypeSet) -> Self {
        Self {
            root: root.to_path_buf(),
            types,
        }
    }

    /// Lazily yield every recognized file under the root
    ///
    /// Each call starts a fresh walk. Unreadable entries are logged and
    /// skipped; traversal order follows the filesystem and is not
    /// guaranteed stable across implementations.
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(error) => {
                    tracing::warn!(%error, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.types.matches(path))
    }

    /// Survey the distinct extensions present under the root
    ///
    /// Pure enumeration, no side effects; the result feeds run reporting.
    /// Fails only when the root itself is not a directory.
    pub fn census(&self) -> Result<ExtensionCensus, ScanError> {
        if !self.root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: self.root.clone(),
            });
        }

        let mut recognized = BTreeSet::new();
        let mut other = BTreeSet::new();

        for entry in WalkDir::new(&self.root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(ext) = filetype::extension_of(entry.path()) {
                if self.types.contains(&ext) {
                    recognized.insert(ext);
                } else {
                    other.insert(ext);
                }
            }
        }

        tracing::info!(
            root = %self.root.display(),
            recognized = ?recognized,
            other = ?other,
            "extension census"
        );
        Ok(ExtensionCensus { recognized, other })
    }
}
