//! Configuration for the voice poller.
//!
//! Resolution order (highest priority first):
//! 1. Environment variables (`CAPTURE_BRIDGE_VOICE_FOLDER`,
//!    `CAPTURE_BRIDGE_HOME`, `CAPTURE_BRIDGE_LEDGER_PATH`)
//! 2. Config file (`.capture-bridge/config.toml`)
//! 3. Built-in defaults
//!
//! `sequential` is not a field here — the cycle loop simply has no
//! concurrency to disable, so there is nothing to toggle at runtime.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

static CONFIG: OnceLock<Result<PollerConfig, String>> = OnceLock::new();

const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;
const DEFAULT_AUDIO_EXTENSION: &str = ".m4a";
const DEFAULT_DOWNLOAD_WAIT_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_CLOUD_RETRY_COUNT: u32 = 3;

/// Raw config file schema (matches `.capture-bridge/config.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub voice_folder: Option<String>,
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub ledger_path: Option<String>,
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    #[serde(default)]
    pub audio_extension: Option<String>,
    #[serde(default)]
    pub download_wait_timeout_ms: Option<u64>,
    #[serde(default)]
    pub cloud_retry_count: Option<u32>,
}

/// Fully resolved configuration, with absolute paths and durations ready to
/// hand to [`crate::ingest`] components.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Absolute directory the scanner watches. Required; no default.
    pub voice_folder: PathBuf,
    /// Poller home directory, default `~/.capture-bridge`.
    pub home: PathBuf,
    /// Path to the SQLite ledger file.
    pub ledger_path: PathBuf,
    pub poll_interval: Duration,
    pub audio_extension: String,
    pub download_wait_timeout: Duration,
    pub cloud_retry_count: u32,
    pub config_file: Option<PathBuf>,
}

impl PollerConfig {
    /// `cloudRetryCount` only changes the count surfaced to `poll status`
    /// and config summaries — the retry delays themselves are fixed at
    /// 1s/2s/4s regardless, so this field is not wired into
    /// [`crate::cloud::retry`].
    pub fn describe(&self) -> String {
        format!(
            "voice_folder={} poll_interval={:?} audio_extension={} download_wait_timeout={:?} cloud_retry_count={}",
            self.voice_folder.display(),
            self.poll_interval,
            self.audio_extension,
            self.download_wait_timeout,
            self.cloud_retry_count,
        )
    }
}

fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;
    loop {
        let candidate = current.join(".capture-bridge").join("config.toml");
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse config file: {}", path.display()))
}

fn resolve_path(base: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

fn load_config() -> Result<PollerConfig> {
    let default_home = dirs::home_dir()
        .context("failed to determine home directory")?
        .join(".capture-bridge");

    let config_file = find_config_file();
    let file: ConfigFile = config_file
        .as_deref()
        .map(load_config_file)
        .transpose()?
        .unwrap_or_default();

    let base_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(Path::new("."));

    let home = std::env::var("CAPTURE_BRIDGE_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(|| file.home.as_deref().map(|h| resolve_path(base_dir, h)))
        .unwrap_or(default_home);

    let voice_folder = std::env::var("CAPTURE_BRIDGE_VOICE_FOLDER")
        .map(PathBuf::from)
        .ok()
        .or_else(|| {
            file.voice_folder
                .as_deref()
                .map(|v| resolve_path(base_dir, v))
        })
        .context(
            "voice_folder is required: set CAPTURE_BRIDGE_VOICE_FOLDER or \
             voice_folder in .capture-bridge/config.toml",
        )?;

    let ledger_path = std::env::var("CAPTURE_BRIDGE_LEDGER_PATH")
        .map(PathBuf::from)
        .ok()
        .or_else(|| {
            file.ledger_path
                .as_deref()
                .map(|l| resolve_path(base_dir, l))
        })
        .unwrap_or_else(|| home.join("ledger.sqlite3"));

    Ok(PollerConfig {
        voice_folder,
        home,
        ledger_path,
        poll_interval: Duration::from_millis(file.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS)),
        audio_extension: file
            .audio_extension
            .unwrap_or_else(|| DEFAULT_AUDIO_EXTENSION.to_string()),
        download_wait_timeout: Duration::from_millis(
            file.download_wait_timeout_ms
                .unwrap_or(DEFAULT_DOWNLOAD_WAIT_TIMEOUT_MS),
        ),
        cloud_retry_count: file.cloud_retry_count.unwrap_or(DEFAULT_CLOUD_RETRY_COUNT),
        config_file,
    })
}

/// The global configuration, resolved once and cached.
pub fn config() -> Result<&'static PollerConfig> {
    match CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string())) {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force a fresh resolution, bypassing the cache. Used by tests and by
/// `poll config` to show what a from-scratch run would resolve to.
pub fn reload_config() -> Result<PollerConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// `load_config` reads the process cwd and environment, both global
    /// state; this guards the tests below from running interleaved under
    /// Cargo's default multi-threaded test runner.
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn missing_voice_folder_is_an_error() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        std::env::set_current_dir(&temp).unwrap();
        std::env::remove_var("CAPTURE_BRIDGE_VOICE_FOLDER");
        assert!(load_config().is_err());
    }

    #[test]
    fn env_var_overrides_config_file() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".capture-bridge");
        std::fs::create_dir_all(&dir).unwrap();
        let mut file = std::fs::File::create(dir.join("config.toml")).unwrap();
        writeln!(file, r#"voice_folder = "/from/file""#).unwrap();

        std::env::set_current_dir(temp.path()).unwrap();
        std::env::set_var("CAPTURE_BRIDGE_VOICE_FOLDER", "/from/env");

        let config = load_config().unwrap();
        assert_eq!(config.voice_folder, PathBuf::from("/from/env"));

        std::env::remove_var("CAPTURE_BRIDGE_VOICE_FOLDER");
    }

    #[test]
    fn defaults_are_applied_when_file_omits_optional_fields() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".capture-bridge");
        std::fs::create_dir_all(&dir).unwrap();
        let mut file = std::fs::File::create(dir.join("config.toml")).unwrap();
        writeln!(file, r#"voice_folder = "/voice""#).unwrap();

        std::env::set_current_dir(temp.path()).unwrap();
        std::env::remove_var("CAPTURE_BRIDGE_VOICE_FOLDER");

        let config = load_config().unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(30_000));
        assert_eq!(config.audio_extension, ".m4a");
        assert_eq!(config.cloud_retry_count, 3);
    }
}
