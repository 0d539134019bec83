//! Periodic, cancellable cycle driver.
//!
//! A stop channel plus a background `JoinHandle` drive shutdown; cycles are
//! triggered by a `tokio::time::interval` ticker rather than by reacting to
//! filesystem events, since this poller scans on a timer by design.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::cycle::PollCycle;

struct RunningState {
    stop_tx: mpsc::Sender<()>,
    #[allow(dead_code)]
    task: JoinHandle<()>,
}

/// Drives a [`PollCycle`] immediately, then on every `poll_interval` tick
/// thereafter, until stopped.
pub struct ContinuousRunner {
    state: std::sync::Mutex<Option<RunningState>>,
    poll_interval: Duration,
}

impl ContinuousRunner {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            state: std::sync::Mutex::new(None),
            poll_interval,
        }
    }

    /// Idempotent: if already running, does nothing and returns `false`.
    pub fn start_continuous(&self, cycle: Arc<PollCycle>) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.is_some() {
            return false;
        }

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let poll_interval = self.poll_interval;

        let task = tokio::spawn(async move {
            tick(&cycle).await;

            let mut interval = tokio::time::interval(poll_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            interval.tick().await; // consume the immediate first tick

            loop {
                tokio::select! {
                    _ = interval.tick() => tick(&cycle).await,
                    _ = stop_rx.recv() => break,
                }
            }
        });

        *state = Some(RunningState { stop_tx, task });
        true
    }

    /// Cancels the timer so no new cycle starts. Idempotent. Does not await
    /// a cycle already in progress — callers needing prompt termination
    /// must combine this with process-level shutdown.
    pub fn stop(&self) {
        if let Some(state) = self.state.lock().unwrap().take() {
            let _ = state.stop_tx.try_send(());
        }
    }

    /// Equivalent to [`Self::stop`]; named for resource-lifecycle parity.
    pub fn shutdown(&self) {
        self.stop();
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap().is_some()
    }
}

#[instrument(skip(cycle))]
async fn tick(cycle: &PollCycle) {
    match cycle.run().await {
        Ok(result) => info!(
            files_processed = result.files_processed,
            duplicates_skipped = result.duplicates_skipped,
            errors = result.errors.len(),
            "tick complete"
        ),
        Err(e) => error!(error = %e, "poll cycle failed; will retry next tick"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::stub::StubCloudAdapter;
    use crate::ingest::fingerprint::Sha256Fingerprinter;
    use crate::ingest::scanner::FolderScanner;
    use crate::ledger::Ledger;
    use tempfile::TempDir;

    fn test_cycle(dir: &TempDir) -> Arc<PollCycle> {
        Arc::new(PollCycle::new(
            FolderScanner::new(dir.path().to_path_buf(), ".m4a"),
            Ledger::open_in_memory().unwrap(),
            Arc::new(StubCloudAdapter::new()),
            Duration::from_secs(60),
            Box::new(Sha256Fingerprinter),
        ))
    }

    #[tokio::test]
    async fn start_continuous_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let runner = ContinuousRunner::new(Duration::from_secs(30));
        let cycle = test_cycle(&dir);

        assert!(runner.start_continuous(cycle.clone()));
        assert!(!runner.start_continuous(cycle));
        assert!(runner.is_running());
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_marks_not_running() {
        let dir = TempDir::new().unwrap();
        let runner = ContinuousRunner::new(Duration::from_secs(30));
        let cycle = test_cycle(&dir);

        runner.start_continuous(cycle);
        runner.stop();
        assert!(!runner.is_running());

        // Calling stop again on an already-stopped runner must not panic.
        runner.stop();
    }

    #[tokio::test]
    async fn shutdown_is_an_alias_for_stop() {
        let dir = TempDir::new().unwrap();
        let runner = ContinuousRunner::new(Duration::from_secs(30));
        let cycle = test_cycle(&dir);

        runner.start_continuous(cycle);
        runner.shutdown();
        assert!(!runner.is_running());
    }
}
