//! Command-line interface for the voice poller.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod poll;

#[derive(Parser, Debug)]
#[command(name = "capture-bridge-voice-poller")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Voice memo poller commands
    Poll {
        #[command(subcommand)]
        action: PollCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum PollCommands {
    /// Run a single poll cycle and exit
    Run,

    /// Run continuously on the configured poll interval until Ctrl-C
    Watch,

    /// Show the configured voice folder, ledger path, and last watermark
    Status,

    /// Show the resolved configuration
    Config,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Poll { action } => match action {
                PollCommands::Run => poll::execute_run().await,
                PollCommands::Watch => poll::execute_watch().await,
                PollCommands::Status => poll::execute_status().await,
                PollCommands::Config => poll::execute_config().await,
            },
        }
    }
}
