//! # Media Sorter
//!
//! Deduplicates photos and videos into a date-bucketed archive.
//!
//! ## Core Philosophy
//! - **Content-addressed** - A file is a duplicate if and only if its bytes
//!   match something already archived, regardless of name or location
//! - **Never trust the index blindly** - The persisted fingerprint index is
//!   reconciled against the live archive on every open and rebuilt from the
//!   files themselves when it disagrees
//! - **Per-file failures never kill the batch** - An unreadable file is
//!   logged and skipped; the run continues
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and a thin CLI:
//! - `core` - The dedup-and-archive engine
//! - `error` - Error types with path context

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use error::{ArchiveError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
