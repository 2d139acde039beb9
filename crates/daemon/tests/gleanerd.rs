// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-level tests for the gleanerd binary

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn gleanerd(state: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gleanerd"));
    cmd.env("GLEANER_STATE_DIR", state)
        .env("XDG_CONFIG_HOME", state.join("config"))
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    cmd
}

/// Spawn and wait for the READY line
fn start(state: &Path) -> Child {
    let mut child = gleanerd(state).spawn().unwrap();
    let mut line = String::new();
    BufReader::new(child.stdout.as_mut().unwrap())
        .read_line(&mut line)
        .unwrap();
    assert_eq!(line.trim(), "READY");
    child
}

fn signal(child: &Child, name: &str) {
    let status = Command::new("kill")
        .args([name, &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::process::ExitStatus {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        if start.elapsed() > timeout {
            let _ = child.kill();
            panic!("gleanerd did not exit within {:?}", timeout);
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

fn state_dir(dir: &TempDir) -> PathBuf {
    dir.path().join("state")
}

#[test]
fn sigterm_shuts_down_and_removes_runtime_files() {
    let dir = TempDir::new().unwrap();
    let state = state_dir(&dir);
    let mut child = start(&state);

    assert!(state.join("daemon.sock").exists());
    assert_eq!(
        std::fs::read_to_string(state.join("daemon.pid"))
            .unwrap()
            .trim(),
        child.id().to_string()
    );

    signal(&child, "-TERM");
    let status = wait_with_timeout(&mut child, Duration::from_secs(10));

    assert!(status.success());
    assert!(!state.join("daemon.sock").exists());
    assert!(!state.join("daemon.pid").exists());
}

#[test]
fn second_instance_fails_without_disturbing_the_first() {
    let dir = TempDir::new().unwrap();
    let state = state_dir(&dir);
    let mut first = start(&state);

    let second = gleanerd(&state).output().unwrap();
    assert!(!second.status.success());
    assert!(!String::from_utf8_lossy(&second.stdout).contains("READY"));

    // The running daemon keeps its socket and pid
    assert!(state.join("daemon.sock").exists());
    assert_eq!(
        std::fs::read_to_string(state.join("daemon.pid"))
            .unwrap()
            .trim(),
        first.id().to_string()
    );

    signal(&first, "-TERM");
    assert!(wait_with_timeout(&mut first, Duration::from_secs(10)).success());
}
