//! A scriptable [`CloudAdapter`] double, so ingest-level tests can exercise
//! retry/conflict/timeout paths without a real `icloudctl` binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::CloudStatus;

use super::{CloudAdapter, CloudError};

/// What [`StubCloudAdapter::check`]/`download` should do for one path, one
/// call at a time. Consumed in order as the queue drains; once empty,
/// `check` returns `materialized()` and `download` succeeds.
#[derive(Debug, Clone)]
pub enum Scripted {
    Status(CloudStatus),
    Err(String),
}

#[derive(Default)]
pub struct StubCloudAdapter {
    checks: Mutex<HashMap<PathBuf, Vec<Scripted>>>,
    downloads: Mutex<HashMap<PathBuf, Vec<Scripted>>>,
    check_calls: Mutex<Vec<PathBuf>>,
    download_calls: Mutex<Vec<PathBuf>>,
}

impl StubCloudAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_check(&self, path: impl Into<PathBuf>, responses: Vec<Scripted>) {
        self.checks.lock().unwrap().insert(path.into(), responses);
    }

    pub fn script_download(&self, path: impl Into<PathBuf>, responses: Vec<Scripted>) {
        self.downloads
            .lock()
            .unwrap()
            .insert(path.into(), responses);
    }

    pub fn check_call_count(&self, path: &Path) -> usize {
        self.check_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_path() == path)
            .count()
    }

    pub fn download_calls_for(&self, path: &Path) -> usize {
        self.download_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_path() == path)
            .count()
    }
}

#[async_trait]
impl CloudAdapter for StubCloudAdapter {
    async fn check(&self, path: &Path) -> Result<CloudStatus, CloudError> {
        self.check_calls.lock().unwrap().push(path.to_path_buf());
        let next = self
            .checks
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(|queue| (!queue.is_empty()).then(|| queue.remove(0)));

        match next {
            None => Ok(CloudStatus::materialized()),
            Some(Scripted::Status(status)) => Ok(status),
            Some(Scripted::Err(message)) => Err(CloudError::CheckFailed(message)),
        }
    }

    async fn download(&self, path: &Path) -> Result<(), CloudError> {
        self.download_calls
            .lock()
            .unwrap()
            .push(path.to_path_buf());
        let next = self
            .downloads
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(|queue| (!queue.is_empty()).then(|| queue.remove(0)));

        match next {
            None | Some(Scripted::Status(_)) => Ok(()),
            Some(Scripted::Err(message)) => Err(CloudError::DownloadFailed(message)),
        }
    }
}
