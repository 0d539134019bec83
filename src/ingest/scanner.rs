//! Produces the candidate file set for a cycle.
//!
//! Pull-based by design: push/event-based filesystem notification is out of
//! scope for this poller, so this scanner is a plain `read_dir` sweep
//! invoked once per `PollCycle` rather than a watcher driven off
//! filesystem events.

use std::path::{Path, PathBuf};

use crate::domain::{has_audio_extension, VoiceFile};

use super::errors::ScanError;

pub struct FolderScanner {
    folder: PathBuf,
    extension: String,
}

impl FolderScanner {
    pub fn new(folder: PathBuf, extension: impl Into<String>) -> Self {
        Self {
            folder,
            extension: extension.into(),
        }
    }

    /// Enumerate matching files, sorted lexicographically by filename for
    /// deterministic scan order across cycles. Does not recurse and does
    /// not follow symlinks outside the folder.
    pub async fn scan(&self) -> Result<Vec<VoiceFile>, ScanError> {
        let mut entries = tokio::fs::read_dir(&self.folder)
            .await
            .map_err(|source| ScanError::Io {
                path: self.folder.clone(),
                source,
            })?;

        let mut files = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|source| ScanError::Io {
                path: self.folder.clone(),
                source,
            })?;
            let Some(entry) = entry else { break };

            let path = entry.path();
            if !has_audio_extension(&path, &self.extension) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            let mtime = metadata.modified().map_err(|source| ScanError::Io {
                path: path.clone(),
                source,
            })?;

            files.push(VoiceFile::new(path, mtime));
        }

        files.sort_by(|a, b| a.file_name().cmp(b.file_name()));
        Ok(files)
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn scan_filters_by_extension_case_sensitively() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.m4a"), b"x").unwrap();
        fs::write(dir.path().join("b.M4A"), b"x").unwrap();
        fs::write(dir.path().join("c.txt"), b"x").unwrap();

        let scanner = FolderScanner::new(dir.path().to_path_buf(), ".m4a");
        let files = scanner.scan().await.unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), "a.m4a");
    }

    #[tokio::test]
    async fn scan_sorts_lexicographically_by_filename() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("z.m4a"), b"x").unwrap();
        fs::write(dir.path().join("a.m4a"), b"x").unwrap();
        fs::write(dir.path().join("m.m4a"), b"x").unwrap();

        let scanner = FolderScanner::new(dir.path().to_path_buf(), ".m4a");
        let files = scanner.scan().await.unwrap();

        let names: Vec<&str> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["a.m4a", "m.m4a", "z.m4a"]);
    }

    #[tokio::test]
    async fn scan_does_not_recurse() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("nested.m4a"), b"x").unwrap();
        fs::write(dir.path().join("top.m4a"), b"x").unwrap();

        let scanner = FolderScanner::new(dir.path().to_path_buf(), ".m4a");
        let files = scanner.scan().await.unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), "top.m4a");
    }

    #[tokio::test]
    async fn scan_surfaces_missing_folder_as_io_error() {
        let scanner = FolderScanner::new(PathBuf::from("/nonexistent/voice/folder"), ".m4a");
        assert!(scanner.scan().await.is_err());
    }
}
