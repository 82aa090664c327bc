//! # Index Module
//!
//! The archive's persisted set of known content fingerprints.
//!
//! The index lives in a single file (`fmd5.dat`) at the archive root and
//! is never trusted blindly: on open its length is reconciled against a
//! live count of the archived files, and on disagreement it is discarded
//! and rebuilt by rehashing every file. Persistence applies the same rule
//! in reverse: a known-inconsistent index is never written.
//!
//! Invariant: index length == number of files inside the archive's
//! subdirectories. Files directly at the archive root (the index file
//! itself, for one) are deliberately excluded from that count, so
//! non-bucket files may coexist at the root.

use crate::core::hasher::{self, Fingerprint};
use crate::error::IndexError;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the index file inside the archive root
pub const INDEX_FILE_NAME: &str = "fmd5.dat";

/// The archive's fingerprint index
///
/// Keeps insertion order (for persistence stability) alongside a set for
/// O(1) membership tests.
pub struct FingerprintIndex {
    archive_root: PathBuf,
    order: Vec<Fingerprint>,
    known: HashSet<Fingerprint>,
}

impl FingerprintIndex {
    /// Open the index for an archive root, self-healing if necessary
    ///
    /// Loads the persisted index and accepts it only when its length
    /// matches the live file count. Otherwise the index is rebuilt by
    /// hashing every archived file. Fails with [`IndexError::Inconsistent`]
    /// only when even the rebuilt index disagrees with the live count,
    /// which signals external tampering or partial-write corruption.
    pub fn open(archive_root: &Path) -> Result<Self, IndexError> {
        let live = live_file_count(archive_root)?;

        let order = match load_index_file(archive_root) {
            Some(persisted) if persisted.len() == live => {
                tracing::debug!(
                    root = %archive_root.display(),
                    fingerprints = persisted.len(),
                    "loaded persisted index"
                );
                persisted
            }
            Some(persisted) => {
                tracing::warn!(
                    root = %archive_root.display(),
                    indexed = persisted.len(),
                    live,
                    "persisted index disagrees with archive contents, rebuilding"
                );
                rebuild(archive_root)?
            }
            None => rebuild(archive_root)?,
        };

        if order.len() != live {
            return Err(IndexError::Inconsistent {
                path: archive_root.to_path_buf(),
                indexed: order.len(),
                live,
            });
        }

        let known = order.iter().cloned().collect();
        Ok(Self {
            archive_root: archive_root.to_path_buf(),
            order,
            known,
        })
    }

    /// Membership test for a fingerprint
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.known.contains(fingerprint)
    }

    /// Record a newly archived fingerprint (in memory only)
    ///
    /// Registering a fingerprint that is already present is a no-op; the
    /// engine checks [`contains`](Self::contains) before copying, so a
    /// repeat here would mean the same content exists twice on disk.
    pub fn register(&mut self, fingerprint: Fingerprint) {
        if self.known.insert(fingerprint.clone()) {
            self.order.push(fingerprint);
        }
    }

    /// Number of indexed fingerprints
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Write the index file, but only if it still reconciles
    ///
    /// When the in-memory count disagrees with a fresh live recount the
    /// write is skipped and the previously persisted file left untouched:
    /// a known-inconsistent index must never reach disk. The skip is
    /// logged, not surfaced as an error, because the next open will
    /// rebuild regardless.
    pub fn persist(&self) -> Result<(), IndexError> {
        let live = live_file_count(&self.archive_root)?;
        if self.order.len() != live {
            tracing::error!(
                root = %self.archive_root.display(),
                indexed = self.order.len(),
                live,
                "index count disagrees with archive, skipping persist"
            );
            return Ok(());
        }

        let index_path = self.archive_root.join(INDEX_FILE_NAME);
        let json = serde_json::to_vec(&self.order)?;

        // Write-then-rename so a crash can only lose the update, never
        // truncate the previous index.
        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.archive_root).map_err(|source| {
                IndexError::Write {
                    path: index_path.clone(),
                    source,
                }
            })?;
        tmp.write_all(&json).map_err(|source| IndexError::Write {
            path: index_path.clone(),
            source,
        })?;
        tmp.persist(&index_path).map_err(|e| IndexError::Write {
            path: index_path.clone(),
            source: e.error,
        })?;

        tracing::info!(
            root = %self.archive_root.display(),
            fingerprints = self.order.len(),
            "index persisted"
        );
        Ok(())
    }
}

/// Count the files the index is expected to cover
///
/// Walks everything below the archive root at depth two or more, so files
/// directly at the root never enter the consistency math.
fn live_file_count(archive_root: &Path) -> Result<usize, IndexError> {
    let mut count = 0;
    for entry in WalkDir::new(archive_root).min_depth(2) {
        let entry = entry.map_err(|source| IndexError::Walk {
            path: archive_root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() {
            count += 1;
        }
    }
    Ok(count)
}

/// Load the persisted fingerprint list, if there is a readable one
///
/// Returns `None` for a missing file and for any read or parse failure;
/// both cases mean "rebuild from the files".
fn load_index_file(archive_root: &Path) -> Option<Vec<Fingerprint>> {
    let index_path = archive_root.join(INDEX_FILE_NAME);
    if !index_path.exists() {
        return None;
    }
    let bytes = match fs::read(&index_path) {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(path = %index_path.display(), %error, "could not read index file");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(fingerprints) => Some(fingerprints),
        Err(error) => {
            tracing::warn!(path = %index_path.display(), %error, "index file is malformed");
            None
        }
    }
}

/// Rebuild the index by hashing every archived file
///
/// Files that cannot be hashed are logged and skipped; the resulting
/// shortfall is caught by the caller's final consistency check.
fn rebuild(archive_root: &Path) -> Result<Vec<Fingerprint>, IndexError> {
    tracing::info!(root = %archive_root.display(), "rebuilding index from archive contents");
    let mut fingerprints = Vec::new();
    for entry in WalkDir::new(archive_root).min_depth(2) {
        let entry = entry.map_err(|source| IndexError::Walk {
            path: archive_root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        match hasher::hash_file(entry.path()) {
            Ok(fingerprint) => fingerprints.push(fingerprint),
            Err(error) => {
                tracing::error!(path = %entry.path().display(), %error, "could not hash archived file");
            }
        }
    }
    Ok(fingerprints)
}
