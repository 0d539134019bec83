//! Content-addressed identity for a materialized file.
//!
//! The fingerprint function is a pure, deterministic contract — no
//! assumptions beyond collision resistance and independence from path or
//! mtime. This module provides a concrete default so the crate builds and
//! runs standalone. It hashes the full digest rather than a truncated
//! prefix: a ledger row is permanent, so full collision resistance is kept
//! rather than traded for a shorter key.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::domain::Fingerprint;

use super::errors::FingerprintError;

pub trait Fingerprinter: Send + Sync {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError>;
}

#[derive(Default)]
pub struct Sha256Fingerprinter;

impl Fingerprinter for Sha256Fingerprinter {
    fn fingerprint(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        let bytes = std::fs::read(path).map_err(|source| FingerprintError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let digest = Sha256::digest(&bytes);
        Ok(Fingerprint::new(hex::encode(digest)))
    }
}
