// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Push a ready-made entry, skipping extraction

use crate::client::DaemonClient;
use anyhow::Result;
use gleaner_core::{CaptureEvent, Entry, Source, BROWSER_SOURCE};
use std::path::PathBuf;

#[derive(clap::Args)]
pub struct PushArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub url: String,

    /// Name of the producing source
    #[arg(long, default_value = BROWSER_SOURCE)]
    pub source: String,

    /// Content file to read (stdin when omitted or `-`)
    pub file: Option<PathBuf>,
}

pub async fn handle(client: &DaemonClient, args: PushArgs) -> Result<()> {
    let content = super::read_input(args.file.as_deref())?;
    let entry = Entry::new(args.title, content, Source::new(args.source, args.url.clone()));

    client.capture(CaptureEvent::from(entry)).await?;
    println!("Pushed {}", args.url);
    Ok(())
}
