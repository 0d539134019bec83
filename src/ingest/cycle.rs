//! Orchestrates one pass: scan, filter by watermark, then per file in scan
//! order run dedup → materialize → fingerprint → dedup → stage.
//!
//! Each file follows a try/record/continue shape: a failure on one file is
//! recorded into `PollResult.errors` and the cycle moves to the next file
//! rather than aborting. There are no in-cycle retries here — those live
//! only inside [`crate::cloud::adapter::IcloudctlAdapter`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::cloud::CloudAdapter;
use crate::domain::{PollResult, WATERMARK_KEY};
use crate::ledger::Ledger;

use super::dedup::DedupGate;
use super::download::DownloadOrchestrator;
use super::errors::CycleError;
use super::fingerprint::Fingerprinter;
use super::scanner::FolderScanner;
use super::stager::{CaptureStager, StageOutcome};

pub struct PollCycle {
    scanner: FolderScanner,
    ledger: Ledger,
    downloader: DownloadOrchestrator,
    fingerprinter: Box<dyn Fingerprinter>,
}

impl PollCycle {
    pub fn new(
        scanner: FolderScanner,
        ledger: Ledger,
        cloud: Arc<dyn CloudAdapter>,
        download_wait_timeout: Duration,
        fingerprinter: Box<dyn Fingerprinter>,
    ) -> Self {
        Self {
            scanner,
            ledger,
            downloader: DownloadOrchestrator::new(cloud, download_wait_timeout),
            fingerprinter,
        }
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<PollResult, CycleError> {
        let start = Instant::now();
        let mut result = PollResult::new();

        let files = self
            .scanner
            .scan()
            .await
            .map_err(|_| CycleError::FolderUnavailable(self.scanner.folder().to_path_buf()))?;
        result.files_found = files.len();

        let cursor = self
            .ledger
            .get_watermark(WATERMARK_KEY)
            .ok()
            .flatten()
            .and_then(|w| w.as_instant());

        let to_process = files.into_iter().filter(|f| match cursor {
            Some(cursor) => DateTime::<Utc>::from(f.mtime) > cursor,
            None => true,
        });

        for file in to_process {
            let channel_native_id = file.channel_native_id();

            match DedupGate::new(&self.ledger).is_duplicate_by_path(&channel_native_id) {
                Ok(true) => {
                    result.duplicates_skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    result.record_error(&channel_native_id, e.to_string());
                    continue;
                }
            }

            if let Err(e) = self.downloader.ensure_materialized(&file.path).await {
                result.record_error(&channel_native_id, e.to_string());
                continue;
            }

            let fp = match self.fingerprinter.fingerprint(&file.path) {
                Ok(fp) => fp,
                Err(e) => {
                    result.record_error(&channel_native_id, e.to_string());
                    continue;
                }
            };

            match DedupGate::new(&self.ledger).is_duplicate_by_content(&fp) {
                Ok(true) => {
                    result.duplicates_skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    result.record_error(&channel_native_id, e.to_string());
                    continue;
                }
            }

            let now = self.ledger.now().unwrap_or_else(|_| Utc::now());
            match CaptureStager::new(&self.ledger).stage(&channel_native_id, &fp, now) {
                Ok(StageOutcome::Staged(_)) => result.files_processed += 1,
                Ok(StageOutcome::DuplicateByPath) => result.duplicates_skipped += 1,
                Err(e) => result.record_error(&channel_native_id, e.to_string()),
            }
        }

        let now = self.ledger.now().unwrap_or_else(|_| Utc::now());
        if let Err(e) = self.ledger.set_watermark(WATERMARK_KEY, now, now) {
            warn!(error = %e, "failed to advance watermark; next cycle will re-examine this window");
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            files_found = result.files_found,
            files_processed = result.files_processed,
            duplicates_skipped = result.duplicates_skipped,
            errors = result.errors.len(),
            duration_ms = result.duration_ms,
            "poll cycle complete"
        );
        Ok(result)
    }

    /// The currently persisted `voice_last_poll` cursor, if any. Exposed for
    /// `poll status` and for tests asserting watermark monotonicity.
    pub fn current_watermark(&self) -> Option<DateTime<Utc>> {
        self.ledger.get_watermark(WATERMARK_KEY).ok().flatten().and_then(|w| w.as_instant())
    }
}
