// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! gleaner - capture pages into the daemon's delivery buffer

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{capture, daemon, push};
use gleaner_daemon::Config;
use std::path::PathBuf;

use crate::client::DaemonClient;

#[derive(Parser)]
#[command(
    name = "gleaner",
    version,
    about = "gleaner - buffer captured pages for ingestion"
)]
struct Cli {
    /// Config file (defaults to ~/.config/gleaner/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a page's HTML; readable text is extracted by the daemon
    Capture(capture::CaptureArgs),
    /// Push a ready-made entry
    Push(push::PushArgs),
    /// Deliver pending entries now
    Flush,
    /// Show daemon status
    Status,
    /// Stop the daemon
    Stop,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Stop doesn't need a live connection
    if let Commands::Stop = cli.command {
        return daemon::stop(&config).await;
    }

    tracing::debug!(socket = %config.socket_path.display(), "connecting to daemon");
    let client = DaemonClient::connect(&config)?;

    match cli.command {
        Commands::Capture(args) => capture::handle(&client, args).await?,
        Commands::Push(args) => push::handle(&client, args).await?,
        Commands::Flush => daemon::flush(&client).await?,
        Commands::Status => daemon::status(&client).await?,
        Commands::Stop => unreachable!(),
    }

    Ok(())
}

fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
