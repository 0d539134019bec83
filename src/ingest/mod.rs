//! The voice memo ingestion pipeline: scan, ensure-materialized, dedup,
//! fingerprint, stage, driven one cycle at a time.
//!
//! ```text
//! FolderScanner → DownloadOrchestrator → DedupGate → Fingerprinter → CaptureStager
//!                                (all orchestrated per-file by PollCycle)
//! ```

pub mod cycle;
pub mod dedup;
pub mod download;
pub mod errors;
pub mod fingerprint;
pub mod runner;
pub mod scanner;
pub mod stager;

pub use cycle::PollCycle;
pub use dedup::DedupGate;
pub use download::DownloadOrchestrator;
pub use errors::CycleError;
pub use fingerprint::{Fingerprinter, Sha256Fingerprinter};
pub use runner::ContinuousRunner;
pub use scanner::FolderScanner;
pub use stager::{CaptureStager, StageOutcome};
