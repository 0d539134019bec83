//! Idempotent cloud-sync voice memo poller.
//!
//! Watches a cloud-synced folder (e.g. iCloud Drive's Voice Memos mirror),
//! materializes dataless placeholders, fingerprints content, and stages
//! each new recording into a shared SQLite ledger — deduplicating both by
//! path and by content so a file is never staged twice, however many times
//! it is rescanned.
//!
//! # Modules
//!
//! - `domain`: plain data types (`VoiceFile`, `CloudStatus`, `Fingerprint`,
//!   `CaptureRecord`, `Watermark`, `PollResult`)
//! - `cloud`: the external cloud CLI boundary (`check`/`download`, retried)
//! - `ledger`: SQLite-backed watermark store, L1 dedup index, and stager
//! - `ingest`: the pipeline itself (scan, materialize, dedup, fingerprint,
//!   stage) driven one cycle at a time, optionally on a periodic timer
//! - `config`: environment / TOML-file / default configuration resolution
//! - `cli`: the `capture-bridge-voice-poller` command-line surface

pub mod cli;
pub mod cloud;
pub mod config;
pub mod domain;
pub mod ingest;
pub mod ledger;

pub use cloud::{CloudAdapter, CloudError, IcloudctlAdapter};
pub use domain::{CaptureRecord, CloudStatus, Fingerprint, PollResult, VoiceFile, Watermark};
pub use ingest::{ContinuousRunner, CycleError, FolderScanner, PollCycle};
pub use ledger::{Ledger, LedgerError};
