// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands that talk to the daemon about the queue itself

use crate::client::{daemon_stop, DaemonClient, DaemonStatus};
use anyhow::Result;
use gleaner_daemon::Config;
use gleaner_engine::FlushOutcome;

pub async fn flush(client: &DaemonClient) -> Result<()> {
    match client.flush().await? {
        FlushOutcome::Idle => println!("Nothing to flush"),
        FlushOutcome::Delivered { count } => println!("Delivered {}", plural(count)),
        FlushOutcome::Deferred { pending, reason } => {
            anyhow::bail!("delivery failed, {} kept: {}", plural(pending), reason)
        }
    }
    Ok(())
}

pub async fn status(client: &DaemonClient) -> Result<()> {
    let status = client.status().await?;
    print!("{}", format_status(&status));
    Ok(())
}

pub async fn stop(config: &Config) -> Result<()> {
    if daemon_stop(config).await? {
        println!("Daemon stopped");
    } else {
        println!("Daemon not running");
    }
    Ok(())
}

fn format_status(status: &DaemonStatus) -> String {
    format!(
        "Daemon: running (version {})\nUptime: {}\nPending: {}\nBusy: {}\n",
        status.version,
        format_uptime(status.uptime_secs),
        plural(status.pending),
        if status.locked { "yes" } else { "no" },
    )
}

fn format_uptime(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

fn plural(count: usize) -> String {
    match count {
        1 => "1 entry".to_string(),
        n => format!("{} entries", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(5), "5s");
        assert_eq!(format_uptime(65), "1m 5s");
        assert_eq!(format_uptime(3 * 3600 + 7), "3h 0m 7s");
    }

    #[test]
    fn status_text() {
        let text = format_status(&DaemonStatus {
            version: "0.1.0".to_string(),
            uptime_secs: 90,
            pending: 1,
            locked: false,
        });
        assert_eq!(
            text,
            "Daemon: running (version 0.1.0)\nUptime: 1m 30s\nPending: 1 entry\nBusy: no\n"
        );
    }
}
