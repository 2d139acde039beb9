// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capture events submitted by producers

use crate::entry::Entry;
use serde::{Deserialize, Serialize};

/// A capture submitted by a producer (browser bridge, script, CLI)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureEvent {
    /// Raw page state, run through the extractor before queueing
    Page {
        url: String,
        html: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    /// A pre-built entry, queued as-is
    Entry { entry: Entry },
}

impl CaptureEvent {
    pub fn page(url: impl Into<String>, html: impl Into<String>, title: Option<String>) -> Self {
        CaptureEvent::Page {
            url: url.into(),
            html: html.into(),
            title,
        }
    }

    /// URL the capture refers to, for logging
    pub fn url(&self) -> &str {
        match self {
            CaptureEvent::Page { url, .. } => url,
            CaptureEvent::Entry { entry } => &entry.source().url,
        }
    }
}

impl From<Entry> for CaptureEvent {
    fn from(entry: Entry) -> Self {
        CaptureEvent::Entry { entry }
    }
}
