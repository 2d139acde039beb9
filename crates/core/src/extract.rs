// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extractor seam for turning raw page HTML into readable text
//!
//! Real readability extraction lives outside this workspace. `TextExtractor`
//! only strips markup so raw page captures can flow end to end.

use regex::Regex;
use std::sync::LazyLock;

// Elements whose text is never readable content
#[allow(clippy::expect_used)]
static HIDDEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<!--.*?-->|<head\b.*?</head\s*>|<script\b.*?</script\s*>|<style\b.*?</style\s*>|<noscript\b.*?</noscript\s*>|<template\b.*?</template\s*>",
    )
    .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static SPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("constant regex pattern is valid"));

/// Readable content pulled out of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub title: Option<String>,
    pub content: String,
}

/// Turns page HTML into readable content.
///
/// Returns `None` when the page has nothing readable; such captures are dropped.
pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str) -> Option<Extracted>;
}

/// Markup-stripping extractor
#[derive(Debug, Clone)]
pub struct TextExtractor {
    min_chars: usize,
}

impl TextExtractor {
    pub fn new() -> Self {
        Self { min_chars: 1 }
    }

    /// Require at least this many characters of text before accepting a page
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars.max(1);
        self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for TextExtractor {
    fn extract(&self, html: &str) -> Option<Extracted> {
        let title = TITLE_PATTERN
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| normalize(&decode_entities(&TAG_PATTERN.replace_all(m.as_str(), " "))))
            .filter(|t| !t.is_empty());

        let visible = HIDDEN_PATTERN.replace_all(html, " ");
        let text = TAG_PATTERN.replace_all(&visible, " ");
        let content = normalize(&decode_entities(&text));

        if content.chars().count() < self.min_chars {
            return None;
        }

        Some(Extracted { title, content })
    }
}

fn normalize(text: &str) -> String {
    SPACE_PATTERN.replace_all(text, " ").trim().to_string()
}

// &amp; last so "&amp;lt;" decodes to "&lt;" rather than "<"
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
