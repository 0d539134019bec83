//! `poll run` / `poll watch` / `poll status` / `poll config`.
//!
//! Thin command handlers: each builds a [`PollCycle`] from resolved config
//! and drives it once (`run`), on a timer (`watch`), or just reports
//! ledger/config state (`status`, `config`) without touching the cloud.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cloud::IcloudctlAdapter;
use crate::config::PollerConfig;
use crate::ingest::{ContinuousRunner, FolderScanner, PollCycle, Sha256Fingerprinter};
use crate::ledger::Ledger;

fn build_cycle(config: &PollerConfig) -> Result<PollCycle> {
    let scanner = FolderScanner::new(config.voice_folder.clone(), &config.audio_extension);
    let ledger = Ledger::open(&config.ledger_path)
        .with_context(|| format!("failed to open ledger at {}", config.ledger_path.display()))?;
    let cloud = Arc::new(IcloudctlAdapter::new());
    Ok(PollCycle::new(
        scanner,
        ledger,
        cloud,
        config.download_wait_timeout,
        Box::new(Sha256Fingerprinter),
    ))
}

pub async fn execute_run() -> Result<()> {
    let config = crate::config::config()?;
    let cycle = build_cycle(config)?;

    let result = cycle.run().await.context("poll cycle failed")?;

    println!("Scanned {} file(s)", result.files_found);
    println!("Staged:     {}", result.files_processed);
    println!("Duplicates: {}", result.duplicates_skipped);
    if result.errors.is_empty() {
        println!("Errors:     none");
    } else {
        println!("Errors:     {}", result.errors.len());
        for (path, message) in &result.errors {
            println!("  {path}: {message}");
        }
    }

    Ok(())
}

pub async fn execute_watch() -> Result<()> {
    let config = crate::config::config()?;
    let cycle = Arc::new(build_cycle(config)?);
    let runner = ContinuousRunner::new(config.poll_interval);

    println!(
        "Watching {} every {:?} (Ctrl-C to stop)",
        config.voice_folder.display(),
        config.poll_interval
    );
    runner.start_continuous(cycle);

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    println!("Shutting down...");
    runner.stop();
    Ok(())
}

pub async fn execute_status() -> Result<()> {
    let config = crate::config::config()?;
    let ledger = Ledger::open(&config.ledger_path)
        .with_context(|| format!("failed to open ledger at {}", config.ledger_path.display()))?;

    println!("Voice folder: {}", config.voice_folder.display());
    println!("Ledger:       {}", config.ledger_path.display());

    match ledger.get_watermark(crate::domain::WATERMARK_KEY)? {
        Some(watermark) => println!("Last poll:    {}", watermark.value),
        None => println!("Last poll:    never"),
    }

    Ok(())
}

pub async fn execute_config() -> Result<()> {
    let config = crate::config::config()?;
    println!("{}", config.describe());
    match &config.config_file {
        Some(path) => println!("Loaded from:  {}", path.display()),
        None => println!("Loaded from:  defaults + environment (no config file found)"),
    }
    Ok(())
}
