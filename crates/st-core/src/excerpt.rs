//! Source excerpt location and highlighting for the "view original text"
//! feature.
//!
//! The server returns a context window around a document offset. The stored
//! excerpt is located inside that window by exact match, then by a trimmed
//! match. When neither matches the window is shown unmarked with an explicit
//! note; text is never marked at a guessed position.

use std::fmt::Write as _;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisItem;

/// Appended when the excerpt cannot be found in the context window.
pub const NOT_LOCATED_NOTE: &str = "(excerpt not located; showing surrounding context)";

/// Characters of context requested on each side of the excerpt.
pub const DEFAULT_SOURCE_WINDOW: u32 = 200;

/// Response of `GET /jobs/{id}/source`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SourceSnippet {
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub end: u64,
    /// Length of the whole source document.
    #[serde(default)]
    pub length: u64,
}

/// Where an excerpt sits inside a context string (byte offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcerptLocation {
    /// Nothing to locate.
    Empty,
    Exact { start: usize, end: usize },
    /// Found only after trimming surrounding whitespace from the excerpt.
    Trimmed { start: usize, end: usize },
    NotLocated,
}

impl ExcerptLocation {
    #[must_use]
    pub const fn span(self) -> Option<(usize, usize)> {
        match self {
            Self::Exact { start, end } | Self::Trimmed { start, end } => Some((start, end)),
            Self::Empty | Self::NotLocated => None,
        }
    }
}

#[must_use]
pub fn locate_excerpt(context: &str, excerpt: &str) -> ExcerptLocation {
    if excerpt.is_empty() {
        return ExcerptLocation::Empty;
    }
    if let Some(start) = context.find(excerpt) {
        return ExcerptLocation::Exact {
            start,
            end: start + excerpt.len(),
        };
    }
    let trimmed = excerpt.trim();
    if !trimmed.is_empty()
        && let Some(start) = context.find(trimmed)
    {
        return ExcerptLocation::Trimmed {
            start,
            end: start + trimmed.len(),
        };
    }
    ExcerptLocation::NotLocated
}

/// How the located excerpt is marked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// HTML-escape everything and wrap the match in `<mark>`.
    Html,
    /// Reverse-video ANSI escape for terminals.
    Ansi,
    /// `[[` and `]]` around the match, for plain logs.
    Brackets,
}

impl Markup {
    const fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::Html => ("<mark>", "</mark>"),
            Self::Ansi => ("\u{1b}[7m", "\u{1b}[0m"),
            Self::Brackets => ("[[", "]]"),
        }
    }

    fn escape(self, text: &str) -> String {
        match self {
            Self::Html => escape_html(text),
            Self::Ansi | Self::Brackets => text.to_string(),
        }
    }
}

/// Render `context` with `excerpt` marked.
#[must_use]
pub fn highlight(context: &str, excerpt: &str, markup: Markup) -> String {
    let location = locate_excerpt(context, excerpt);
    match location.span() {
        Some((start, end)) => {
            let (open, close) = markup.delimiters();
            format!(
                "{}{open}{}{close}{}",
                markup.escape(&context[..start]),
                markup.escape(&context[start..end]),
                markup.escape(&context[end..]),
            )
        }
        None if location == ExcerptLocation::NotLocated => {
            format!("{}\n\n{NOT_LOCATED_NOTE}", markup.escape(context))
        }
        None => markup.escape(context),
    }
}

#[must_use]
pub fn highlight_html(context: &str, excerpt: &str) -> String {
    highlight(context, excerpt, Markup::Html)
}

#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Character range of an item in the submitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: u64,
    pub end: u64,
}

impl SourceRange {
    /// Range to request for an item, or `None` when the item has no usable
    /// start offset.
    ///
    /// The end falls back to `start + excerpt length`, then `start + 1`, and
    /// is always strictly greater than the start.
    #[must_use]
    pub fn for_item(item: &AnalysisItem) -> Option<Self> {
        let start = u64::try_from(item.source_start?.max(0)).unwrap_or(0);
        let excerpt_len = item.source_excerpt.chars().count() as u64;
        let end = match item.source_end {
            Some(end) => u64::try_from(end).unwrap_or(0),
            None if excerpt_len > 0 => start + excerpt_len,
            None => start + 1,
        };
        Some(Self {
            start,
            end: end.max(start + 1),
        })
    }

    /// Query string pairs for the source endpoint.
    #[must_use]
    pub fn query_pairs(self, window: u32) -> Vec<(&'static str, String)> {
        vec![
            ("start", self.start.to_string()),
            ("end", self.end.to_string()),
            ("window", window.to_string()),
        ]
    }

    /// `start - end` label for display.
    #[must_use]
    pub fn label(self) -> String {
        let mut out = String::new();
        let _ = write!(out, "{} - {}", self.start, self.end);
        out
    }
}
