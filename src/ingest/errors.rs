//! Error taxonomy for the ingestion pipeline: one `thiserror` enum per
//! module, `#[from]` at the seams, `anyhow` only at the CLI boundary.

use std::path::PathBuf;

use thiserror::Error;

use crate::cloud::CloudError;
use crate::ledger::LedgerError;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read folder {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error("cloud reports an unresolved conflict for {0}")]
    ConflictDetected(PathBuf),

    #[error("materialization of {path} did not complete within {timeout_ms}ms")]
    Timeout { path: PathBuf, timeout_ms: u64 },
}

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("failed to read {path} for fingerprinting: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DedupError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Cycle-fatal conditions. Per-file failures never reach here — they are
/// recorded in `PollResult.errors` and the cycle continues.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("voice folder unavailable: {0}")]
    FolderUnavailable(PathBuf),
}
