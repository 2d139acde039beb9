// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capture a raw page

use crate::client::DaemonClient;
use anyhow::Result;
use gleaner_core::CaptureEvent;
use std::path::PathBuf;

#[derive(clap::Args)]
pub struct CaptureArgs {
    /// URL the page was loaded from
    #[arg(long)]
    pub url: String,

    /// Title to use when the page has none
    #[arg(long)]
    pub title: Option<String>,

    /// HTML file to read (stdin when omitted or `-`)
    pub file: Option<PathBuf>,
}

pub async fn handle(client: &DaemonClient, args: CaptureArgs) -> Result<()> {
    let html = super::read_input(args.file.as_deref())?;
    let event = CaptureEvent::page(args.url.clone(), html, args.title);

    if client.capture(event).await? {
        println!("Captured {}", args.url);
    } else {
        println!("No readable content at {}, nothing captured", args.url);
    }
    Ok(())
}
