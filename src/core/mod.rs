//! # Core Module
//!
//! The UI-agnostic dedup-and-archive engine.
//!
//! ## Modules
//! - `filetype` - Classifies files by extension into photo/video/generic
//! - `hasher` - Computes content fingerprints
//! - `timestamp` - Resolves a capture time per file (EXIF or mtime)
//! - `bucket` - Formats date-bucket folder names
//! - `index` - The archive's persisted fingerprint index
//! - `scanner` - Discovers candidate files in the source tree
//! - `engine` - Orchestrates the full dedup-and-copy workflow

pub mod bucket;
pub mod engine;
pub mod filetype;
pub mod hasher;
pub mod index;
pub mod scanner;
pub mod timestamp;

// Re-export commonly used types
pub use bucket::BucketGranularity;
pub use engine::{ArchiveConfig, ArchiveEngine, ArchiveSummary, Outcome};
pub use filetype::{FileKind, FileTypeSet};
pub use hasher::Fingerprint;
pub use index::FingerprintIndex;
pub use scanner::{ExtensionCensus, SourceScanner};
