//! Tolerant line parsing for per-country post exports.
//!
//! Rows look like `<index>,<created_at>,<text...>`. Only the first two commas
//! are significant: everything after the second one is taken as the post
//! text, further commas included.

use crate::dates::DateResolver;
use crate::models::Record;
use crate::text::TextNormalizer;

/// Column name that marks a header row.
pub const HEADER_SENTINEL: &str = "created_at";

/// `true` when `line` looks like the export's header row.
///
/// Callers apply this to the first non-blank line of a source only.
pub fn is_header_line(line: &str) -> bool {
    line.to_ascii_lowercase().contains(HEADER_SENTINEL)
}

// ── RecordParser ──────────────────────────────────────────────────────────────

/// Turns raw lines into [`Record`]s. Never fails: unusable lines are
/// rejected with `None`, unresolvable dates become `date: None`.
#[derive(Debug, Clone, Default)]
pub struct RecordParser {
    resolver: DateResolver,
    normalizer: TextNormalizer,
}

impl RecordParser {
    pub fn new(resolver: DateResolver) -> Self {
        Self {
            resolver,
            normalizer: TextNormalizer::new(),
        }
    }

    pub fn resolver(&self) -> &DateResolver {
        &self.resolver
    }

    /// Parse one line for `country`.
    ///
    /// Returns `None` for blank lines, lines with fewer than two commas and
    /// rows whose date column is the header sentinel.
    pub fn parse(&self, line: &str, country: &str) -> Option<Record> {
        if line.trim().is_empty() {
            return None;
        }

        let (raw_date, text) = split_columns(line)?;
        if raw_date.eq_ignore_ascii_case(HEADER_SENTINEL) {
            return None;
        }

        Some(Record {
            country: country.to_string(),
            raw_date: raw_date.to_string(),
            date: self.resolver.resolve(raw_date),
            text: self.normalizer.normalize(text),
        })
    }
}

/// Split `line` into the trimmed date column and the trimmed remainder.
fn split_columns(line: &str) -> Option<(&str, &str)> {
    let first = line.find(',')?;
    let rest = &line[first + 1..];
    let second = rest.find(',')?;
    Some((rest[..second].trim(), rest[second + 1..].trim()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
