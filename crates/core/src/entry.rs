// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Captured document model

use serde::{Deserialize, Serialize};

/// Source tag for entries captured from browser pages
pub const BROWSER_SOURCE: &str = "browser";

/// Provenance of a captured entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Source for a page captured in the browser
    pub fn browser(url: impl Into<String>) -> Self {
        Self::new(BROWSER_SOURCE, url)
    }
}

/// One captured document queued for remote ingestion.
///
/// Fields are private: an entry does not change after it is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    title: String,
    content: String,
    source: Source,
}

impl Entry {
    pub fn new(title: impl Into<String>, content: impl Into<String>, source: Source) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source,
        }
    }

    /// Build an entry from an extracted page.
    ///
    /// The title is the first non-blank of: the extracted title, the
    /// page-supplied title hint, the page URL.
    pub fn from_page(
        url: &str,
        extracted_title: Option<&str>,
        title_hint: Option<&str>,
        content: impl Into<String>,
    ) -> Self {
        let title = [extracted_title, title_hint]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .unwrap_or(url);

        Self::new(title, content, Source::browser(url))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn source(&self) -> &Source {
        &self.source
    }
}

/// Batch envelope sent to the ingestion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Batch {
    pub items: Vec<Entry>,
}

impl Batch {
    pub fn new(items: Vec<Entry>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
