//! A reference to a cloud-synced audio file.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A candidate audio file discovered by the folder scanner.
///
/// `VoiceFile` never owns or copies bytes; it is a reference to a path that
/// the poller scans, checks, and stages without moving, renaming, or
/// deleting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceFile {
    /// Absolute path; doubles as the `channel_native_id` once staged.
    pub path: PathBuf,

    /// Last-modification instant, used for watermark filtering.
    pub mtime: SystemTime,
}

impl VoiceFile {
    pub fn new(path: PathBuf, mtime: SystemTime) -> Self {
        Self { path, mtime }
    }

    /// The filename component used for deterministic scan ordering.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// The absolute path as a string, used as `channel_native_id`.
    pub fn channel_native_id(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Check whether `path` carries the configured audio extension
/// (case-sensitive: `.M4A` does not match a configured `.m4a`).
pub fn has_audio_extension(path: &Path, extension: &str) -> bool {
    let ext = extension.trim_start_matches('.');
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == ext)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_is_case_sensitive() {
        assert!(has_audio_extension(Path::new("a.m4a"), ".m4a"));
        assert!(!has_audio_extension(Path::new("a.M4A"), ".m4a"));
        assert!(!has_audio_extension(Path::new("a.mp3"), ".m4a"));
    }

    #[test]
    fn channel_native_id_is_the_absolute_path_string() {
        let f = VoiceFile::new(PathBuf::from("/voice/A.m4a"), SystemTime::UNIX_EPOCH);
        assert_eq!(f.channel_native_id(), "/voice/A.m4a");
        assert_eq!(f.file_name(), "A.m4a");
    }
}
