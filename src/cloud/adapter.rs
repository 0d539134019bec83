//! Adapter over the external cloud CLI (`icloudctl`): argv spawn, piped
//! stdio, and a bounded timeout around the two operations this crate
//! depends on, `check` and `download`.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{instrument, warn};

use crate::domain::CloudStatus;

use super::retry;

#[derive(Debug, Error)]
pub enum CloudError {
    #[error("cloud CLI unavailable: {0}")]
    Unavailable(String),

    #[error("cloud check failed after retries: {0}")]
    CheckFailed(String),

    #[error("cloud download failed after retries: {0}")]
    DownloadFailed(String),
}

/// The two cloud operations the core depends on. Implemented by
/// [`IcloudctlAdapter`] for real use and by test doubles for determinism.
#[async_trait]
pub trait CloudAdapter: Send + Sync {
    async fn check(&self, path: &Path) -> Result<CloudStatus, CloudError>;
    async fn download(&self, path: &Path) -> Result<(), CloudError>;
}

/// Spawns `icloudctl check|download <path>` as a bare argv vector — never
/// through a shell — so no path, however adversarial, can alter the
/// invocation.
pub struct IcloudctlAdapter {
    binary_path: String,
}

impl Default for IcloudctlAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl IcloudctlAdapter {
    pub fn new() -> Self {
        Self {
            binary_path: "icloudctl".to_string(),
        }
    }

    pub fn with_binary_path(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    async fn spawn(&self, subcommand: &str, path: &Path) -> Result<(bool, String), AttemptError> {
        let output = Command::new(&self.binary_path)
            .arg(subcommand)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        let output = timeout(retry::WALL_CLOCK_BUDGET, output)
            .await
            .map_err(|_| AttemptError::Spawn(format!("{subcommand} timed out")))?
            .map_err(|e| AttemptError::Spawn(format!("failed to spawn {}: {e}", self.binary_path)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok((output.status.success(), stdout))
    }

    async fn attempt_check(&self, path: &Path) -> Result<CloudStatus, AttemptError> {
        let (ok, stdout) = self.spawn("check", path).await?;
        if !ok {
            return Err(AttemptError::Failed(format!(
                "check exited non-zero: {}",
                stdout.trim()
            )));
        }
        Ok(CloudStatus::parse(&stdout))
    }

    async fn attempt_download(&self, path: &Path) -> Result<(), AttemptError> {
        let (ok, stdout) = self.spawn("download", path).await?;
        if !ok {
            return Err(AttemptError::Failed(format!(
                "download exited non-zero: {}",
                stdout.trim()
            )));
        }
        Ok(())
    }
}

/// Distinguishes a process that never ran from one that ran and failed, so
/// exhaustion can be surfaced as `CloudError::Unavailable` vs.
/// `CheckFailed`/`DownloadFailed`.
enum AttemptError {
    Spawn(String),
    Failed(String),
}

impl AttemptError {
    fn message(&self) -> &str {
        match self {
            AttemptError::Spawn(m) | AttemptError::Failed(m) => m,
        }
    }
}

#[async_trait]
impl CloudAdapter for IcloudctlAdapter {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn check(&self, path: &Path) -> Result<CloudStatus, CloudError> {
        let mut attempt_no = 1;
        loop {
            match self.attempt_check(path).await {
                Ok(status) => return Ok(status),
                Err(err) => {
                    warn!(op = "check", attempt_no, message = err.message(), "cloud call failed");
                    match retry::delay_after(attempt_no) {
                        Some(delay) => {
                            attempt_no += 1;
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            return Err(match err {
                                AttemptError::Spawn(m) => CloudError::Unavailable(m),
                                AttemptError::Failed(m) => CloudError::CheckFailed(m),
                            })
                        }
                    }
                }
            }
        }
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn download(&self, path: &Path) -> Result<(), CloudError> {
        let mut attempt_no = 1;
        loop {
            match self.attempt_download(path).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!(op = "download", attempt_no, message = err.message(), "cloud call failed");
                    match retry::delay_after(attempt_no) {
                        Some(delay) => {
                            attempt_no += 1;
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            return Err(match err {
                                AttemptError::Spawn(m) => CloudError::Unavailable(m),
                                AttemptError::Failed(m) => CloudError::DownloadFailed(m),
                            })
                        }
                    }
                }
            }
        }
    }
}
