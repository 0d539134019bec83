//! Materialization and dataless-download scenarios driven through a full
//! `PollCycle`, including the download-timeout error path.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use voice_poller::cloud::stub::{Scripted, StubCloudAdapter};
use voice_poller::domain::CloudStatus;
use voice_poller::ingest::fingerprint::Sha256Fingerprinter;
use voice_poller::ingest::{FolderScanner, PollCycle};
use voice_poller::ledger::Ledger;

fn dataless() -> CloudStatus {
    CloudStatus {
        is_dataless: true,
        has_conflicts: false,
    }
}

// A dataless file materializes after one download + one wait poll, then
// passes its post-materialization conflict check and gets staged.
#[tokio::test(start_paused = true)]
async fn dataless_file_materializes_and_is_staged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("E.m4a");
    fs::write(&path, b"placeholder bytes").unwrap();

    let scanner = FolderScanner::new(dir.path().to_path_buf(), ".m4a");
    let ledger = Ledger::open_in_memory().unwrap();
    let cloud = Arc::new(StubCloudAdapter::new());
    cloud.script_check(
        path.clone(),
        vec![
            Scripted::Status(dataless()),              // s0: dataless, triggers download
            Scripted::Status(CloudStatus::materialized()), // poll: now materialized
            Scripted::Status(CloudStatus::materialized()), // s1: post-materialization conflict check
        ],
    );

    let cycle = PollCycle::new(
        scanner,
        ledger,
        cloud.clone(),
        Duration::from_secs(60),
        Box::new(Sha256Fingerprinter),
    );
    let result = cycle.run().await.unwrap();

    assert_eq!(result.files_found, 1);
    assert_eq!(result.files_processed, 1);
    assert_eq!(result.duplicates_skipped, 0);
    assert!(result.errors.is_empty());
    assert_eq!(cloud.check_call_count(&path), 3);
    assert_eq!(cloud.download_calls_for(&path), 1);
}

// Materialization never completes within the per-file wait budget: the
// file is skipped, recorded as an error, and the cycle still advances its
// watermark (no poison of the rest of the run).
#[tokio::test(start_paused = true)]
async fn download_timeout_is_recorded_without_staging_or_aborting_the_cycle() {
    let dir = TempDir::new().unwrap();
    let stuck = dir.path().join("stuck.m4a");
    let fine = dir.path().join("zz_fine.m4a");
    fs::write(&stuck, b"placeholder").unwrap();
    fs::write(&fine, b"ready content").unwrap();

    let scanner = FolderScanner::new(dir.path().to_path_buf(), ".m4a");
    let ledger = Ledger::open_in_memory().unwrap();
    let cloud = Arc::new(StubCloudAdapter::new());
    cloud.script_check(stuck.clone(), (0..40).map(|_| Scripted::Status(dataless())).collect());

    let cycle = PollCycle::new(
        scanner,
        ledger,
        cloud,
        Duration::from_millis(3_500),
        Box::new(Sha256Fingerprinter),
    );
    let result = cycle.run().await.unwrap();

    assert_eq!(result.files_found, 2);
    assert_eq!(result.files_processed, 1, "only the ready file should stage");
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].0.ends_with("stuck.m4a"));
    assert!(result.errors[0].1.to_lowercase().contains("materializ"));
}
