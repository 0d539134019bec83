//! Guarantees a file is locally materialized, or fails fast on conflict.
//!
//! The wait-for-materialization backoff here (1s, 2s, 4s, 5s, 5s, …
//! capped at 5s) is distinct from the [`crate::cloud::retry`] ladder used
//! inside each individual `check`/`download` call — one governs how long we
//! wait for a download to land, the other how hard we retry a single flaky
//! subprocess invocation.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{instrument, warn};

use crate::cloud::CloudAdapter;

use super::errors::DownloadError;

pub struct DownloadOrchestrator {
    cloud: Arc<dyn CloudAdapter>,
    wait_timeout: Duration,
}

impl DownloadOrchestrator {
    pub fn new(cloud: Arc<dyn CloudAdapter>, wait_timeout: Duration) -> Self {
        Self { cloud, wait_timeout }
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn ensure_materialized(&self, path: &Path) -> Result<(), DownloadError> {
        let s0 = self.cloud.check(path).await?;
        if s0.is_dataless {
            self.cloud.download(path).await?;
            self.poll_until_materialized(path).await?;
        }

        let s1 = self.cloud.check(path).await?;
        if s1.has_conflicts {
            return Err(DownloadError::ConflictDetected(path.to_path_buf()));
        }
        Ok(())
    }

    async fn poll_until_materialized(&self, path: &Path) -> Result<(), DownloadError> {
        let start = Instant::now();
        let mut delay = Duration::from_secs(1);

        loop {
            if start.elapsed() >= self.wait_timeout {
                return Err(DownloadError::Timeout {
                    path: path.to_path_buf(),
                    timeout_ms: self.wait_timeout.as_millis() as u64,
                });
            }

            tokio::time::sleep(delay).await;

            let status = self.cloud.check(path).await?;
            if !status.is_dataless {
                return Ok(());
            }
            warn!(path = %path.display(), "still dataless, continuing to poll");

            delay = (delay * 2).min(Duration::from_secs(5));
        }
    }
}
