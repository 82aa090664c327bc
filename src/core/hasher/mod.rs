//! # Hasher Module
//!
//! Computes content fingerprints for exact-duplicate detection.
//!
//! Files are read in fixed-size chunks and fed to a streaming XXH3-128
//! accumulator, so hashing a multi-gigabyte video never loads it into
//! memory. Two files fingerprint equal exactly when their bytes are equal;
//! 128-bit collisions are treated as impossible for this domain.

use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use xxhash_rust::xxh3::Xxh3;

/// Read granularity for streaming hashing
const CHUNK_SIZE: usize = 8 * 1024;

/// A content digest identifying a file by its bytes
///
/// Rendered as a 32-character lowercase hex string; this is also the
/// form persisted in the archive's index file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The hex string form of this fingerprint
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reconstruct a fingerprint from its persisted hex form
    pub fn from_hex(hex: String) -> Self {
        Self(hex)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of a file's contents
///
/// Fails only on I/O errors; an empty file hashes fine (to the digest of
/// zero bytes).
pub fn hash_file(path: &Path) -> Result<Fingerprint, HashError> {
    let mut file = File::open(path).map_err(|source| HashError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Xxh3::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let read = file.read(&mut buffer).map_err(|source| HashError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    let fingerprint = Fingerprint(format!("{:032x}", hasher.digest128()));
    tracing::debug!(path = %path.display(), fingerprint = %fingerprint, "hashed file");
    Ok(fingerprint)
}
