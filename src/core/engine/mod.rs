//! # Engine Module
//!
//! Orchestrates the full dedup-and-archive workflow.
//!
//! For each candidate file the engine computes a fingerprint, consults the
//! archive's index, and either skips the file as a duplicate or copies it
//! into its date bucket with collision-safe naming. Processing is strictly
//! sequential; one file is fully handled before the next is considered.
//!
//! Per-file errors are contained here: a file that cannot be hashed or
//! copied is logged, counted as failed, and the batch moves on. Only index
//! corruption at open time and bad configuration abort a run.

use crate::core::bucket::{self, BucketGranularity};
use crate::core::filetype::FileTypeSet;
use crate::core::hasher;
use crate::core::index::FingerprintIndex;
use crate::core::scanner::{ExtensionCensus, SourceScanner};
use crate::core::timestamp;
use crate::error::{ArchiveError, CopyError, Result};
use filetime::FileTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Immutable configuration for one archiving run
///
/// Built once by the caller (the CLI, or a test) and threaded through the
/// engine; nothing reads global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Directory to pull candidate files from
    pub source: PathBuf,
    /// The archive root files are deduplicated into
    pub archive_root: PathBuf,
    /// Extensions to consider, and their kinds
    pub types: FileTypeSet,
    /// Date-bucket granularity
    pub granularity: BucketGranularity,
    /// Delete source files after a successful copy or a duplicate skip
    pub delete_source: bool,
    /// When false, only the extension census runs
    pub scan_enabled: bool,
    /// When false, candidate files are counted but nothing is copied
    pub copy_enabled: bool,
}

impl ArchiveConfig {
    /// Reject configurations that cannot produce a meaningful run
    ///
    /// Called before any filesystem mutation.
    pub fn validate(&self) -> Result<()> {
        if !self.source.is_dir() {
            return Err(ArchiveError::Config(format!(
                "source directory does not exist: {}",
                self.source.display()
            )));
        }
        if !self.archive_root.is_dir() {
            return Err(ArchiveError::Config(format!(
                "destination directory does not exist: {}",
                self.archive_root.display()
            )));
        }
        if self.types.is_empty() {
            return Err(ArchiveError::Config(
                "no recognized extensions to scan".to_string(),
            ));
        }
        Ok(())
    }
}

/// What happened to one candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Copied into its date bucket and registered in the index
    Copied,
    /// Identical content is already archived
    SkippedDuplicate,
    /// Hashing or copying failed; the source file is untouched
    Failed,
}

/// Per-run result counts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveSummary {
    /// Candidate files considered
    pub total: usize,
    /// Files copied into the archive
    pub copied: usize,
    /// Files skipped as exact duplicates
    pub skipped_duplicates: usize,
    /// Files that failed to hash or copy
    pub failed: usize,
    /// Extensions present under the source root
    pub census: ExtensionCensus,
}

/// The dedup-and-archive engine
pub struct ArchiveEngine {
    config: ArchiveConfig,
    index: FingerprintIndex,
}

impl ArchiveEngine {
    /// Validate the configuration and open the archive's index
    ///
    /// This is where index self-healing happens; an archive whose rebuilt
    /// index still disagrees with its contents fails here, before any
    /// copying could make things worse.
    pub fn open(config: ArchiveConfig) -> Result<Self> {
        config.validate()?;
        let index = FingerprintIndex::open(&config.archive_root)?;
        Ok(Self { config, index })
    }

    /// The archive's index, as loaded or rebuilt at open
    pub fn index(&self) -> &FingerprintIndex {
        &self.index
    }

    /// Process every candidate file under the source root
    pub fn run(&mut self) -> Result<ArchiveSummary> {
        self.run_with_progress(|_| {})
    }

    /// Process every candidate, invoking `on_file` before each one
    pub fn run_with_progress<F>(&mut self, mut on_file: F) -> Result<ArchiveSummary>
    where
        F: FnMut(&Path),
    {
        let scanner = SourceScanner::new(&self.config.source, self.config.types.clone());
        let census = scanner.census()?;

        let mut summary = ArchiveSummary {
            census,
            ..Default::default()
        };

        if self.config.scan_enabled {
            for path in scanner.files() {
                on_file(&path);
                summary.total += 1;
                if !self.config.copy_enabled {
                    continue;
                }
                match self.archive(&path) {
                    Outcome::Copied => summary.copied += 1,
                    Outcome::SkippedDuplicate => summary.skipped_duplicates += 1,
                    Outcome::Failed => summary.failed += 1,
                }
            }
        }

        tracing::info!(
            total = summary.total,
            copied = summary.copied,
            skipped = summary.skipped_duplicates,
            failed = summary.failed,
            "run complete"
        );

        self.index.persist()?;
        Ok(summary)
    }

    /// Archive a single file
    ///
    /// Never returns an error; everything that can go wrong with one file
    /// is folded into [`Outcome::Failed`].
    pub fn archive(&mut self, source: &Path) -> Outcome {
        let fingerprint = match hasher::hash_file(source) {
            Ok(fingerprint) => fingerprint,
            Err(error) => {
                tracing::error!(path = %source.display(), %error, "could not fingerprint file");
                return Outcome::Failed;
            }
        };

        if self.index.contains(&fingerprint) {
            tracing::debug!(path = %source.display(), "already archived");
            if self.config.delete_source {
                self.delete_source(source);
            }
            return Outcome::SkippedDuplicate;
        }

        let kind = self.config.types.classify(source);
        let taken = timestamp::resolve(source, kind);
        let bucket = bucket::bucket_name(taken, self.config.granularity);

        match self.copy_into_bucket(source, &bucket) {
            Ok(dest) => {
                tracing::info!(
                    from = %source.display(),
                    to = %dest.display(),
                    "copied into archive"
                );
                self.index.register(fingerprint);
                if self.config.delete_source {
                    self.delete_source(source);
                }
                Outcome::Copied
            }
            Err(error) => {
                tracing::error!(path = %source.display(), %error, "copy failed");
                Outcome::Failed
            }
        }
    }

    /// Copy a file into `archive_root/bucket` under a collision-safe name
    fn copy_into_bucket(&self, source: &Path, bucket: &str) -> std::result::Result<PathBuf, CopyError> {
        let bucket_dir = self.config.archive_root.join(bucket);
        if !bucket_dir.exists() {
            tracing::info!(bucket = %bucket_dir.display(), "creating bucket");
        }
        fs::create_dir_all(&bucket_dir).map_err(|source| CopyError::CreateBucket {
            path: bucket_dir.clone(),
            source,
        })?;

        let dest = unique_destination(&bucket_dir, source);
        fs::copy(source, &dest).map_err(|e| CopyError::Copy {
            source_path: source.to_path_buf(),
            dest_path: dest.clone(),
            source: e,
        })?;
        preserve_times(source, &dest);
        Ok(dest)
    }

    /// Remove a source file after a successful copy or a duplicate skip
    ///
    /// Failure to delete is logged but does not change the outcome; the
    /// archive itself is already in the right state.
    fn delete_source(&self, source: &Path) {
        if let Err(error) = fs::remove_file(source) {
            tracing::warn!(path = %source.display(), %error, "could not delete source file");
        } else {
            tracing::debug!(path = %source.display(), "deleted source file");
        }
    }
}

/// Pick a destination name that does not collide with an existing file
///
/// This is a path-level check, separate from content dedup: two different
/// files may legitimately share a name. Appends `_1`, `_2`, ... before
/// the extension until the name is free.
fn unique_destination(bucket_dir: &Path, source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed");
    let candidate = bucket_dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed");
    let ext = source.extension().and_then(|e| e.to_str());
    let mut counter = 1;
    loop {
        let renamed = match ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let candidate = bucket_dir.join(renamed);
        if !candidate.exists() {
            tracing::debug!(dest = %candidate.display(), "renamed to avoid collision");
            return candidate;
        }
        counter += 1;
    }
}

/// Carry the source's atime/mtime onto the copy
///
/// `fs::copy` already carries permissions; timestamps need explicit help.
/// Best effort: a failure here leaves a correct copy with fresh times.
fn preserve_times(source: &Path, dest: &Path) {
    let metadata = match fs::metadata(source) {
        Ok(metadata) => metadata,
        Err(_) => return,
    };
    let mtime = FileTime::from_last_modification_time(&metadata);
    let atime = FileTime::from_last_access_time(&metadata);
    if let Err(error) = filetime::set_file_times(dest, atime, mtime) {
        tracing::warn!(path = %dest.display(), %error, "could not preserve timestamps");
    }
}
