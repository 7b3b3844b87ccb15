//! Delimiter-based legacy comment format, historically `name|description`.

use super::error::ParseError;
use super::parser::CommentParser;
use super::record::CommentRecord;

pub const DEFAULT_DELIMITER: &str = "|";

/// Universal fallback parser. Accepts every comment, so it must keep the
/// highest priority number of all registered parsers.
#[derive(Debug, Clone)]
pub struct LegacyParser {
    priority: i32,
}

impl LegacyParser {
    pub fn new() -> Self {
        Self { priority: 1000 }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for LegacyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentParser for LegacyParser {
    fn name(&self) -> &str {
        "legacy"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn can_parse(&self, _comment: &str) -> bool {
        true
    }

    fn parse(&self, comment: &str, delimiter: &str) -> Result<CommentRecord, ParseError> {
        if comment.is_empty() {
            return Ok(CommentRecord::from_source(comment));
        }

        let delimiter = if delimiter.is_empty() {
            DEFAULT_DELIMITER
        } else {
            delimiter
        };

        let normalized = normalize_whitespace(comment);
        let parts = split_with_escape(&normalized, delimiter);

        let mut record = CommentRecord::from_source(comment);
        if let Some(first) = parts.first() {
            record.logical_name = first.trim().to_string();
        }
        if let Some(second) = parts.get(1) {
            record.description = second.trim().to_string();
        }

        Ok(record)
    }
}

/// Collapse whitespace runs (tabs, newlines, full-width space included) to
/// single ASCII spaces and trim the ends.
fn normalize_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_is_space = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_is_space {
                result.push(' ');
            }
            prev_is_space = true;
        } else {
            result.push(c);
            prev_is_space = false;
        }
    }

    result.trim().to_string()
}

/// Split on the delimiter honoring a single-character backslash escape:
/// `\<delimiter>` emits the delimiter literally, any other `\x` passes
/// through unchanged.
fn split_with_escape(s: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() || s.is_empty() {
        return vec![s.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < s.len() {
        let rest = &s[i..];

        if let Some(after_escape) = rest.strip_prefix('\\')
            && after_escape.starts_with(delimiter)
        {
            current.push_str(delimiter);
            i += 1 + delimiter.len();
            continue;
        }

        if rest.starts_with(delimiter) {
            parts.push(std::mem::take(&mut current));
            i += delimiter.len();
            continue;
        }

        // Safe: i always sits on a char boundary.
        let c = rest.chars().next().unwrap_or_default();
        current.push(c);
        i += c.len_utf8();
    }

    parts.push(current);
    parts
}

/// Split a raw comment into its logical-name head and optional description
/// tail, using the legacy rules. The tail is `Some` only when the delimiter
/// was actually present.
pub fn split_comment(comment: &str, delimiter: &str) -> (String, Option<String>) {
    let delimiter = if delimiter.is_empty() {
        DEFAULT_DELIMITER
    } else {
        delimiter
    };
    let normalized = normalize_whitespace(comment);
    let parts = split_with_escape(&normalized, delimiter);

    let head = parts.first().map(|p| p.trim().to_string()).unwrap_or_default();
    let tail = parts.get(1).map(|p| p.trim().to_string());
    (head, tail)
}

/// Logical name from a legacy comment, falling back to the physical name.
pub fn extract_logical_name(
    comment: &str,
    delimiter: &str,
    physical_name: &str,
    fallback_to_name: bool,
) -> String {
    let (head, _) = split_comment(comment, delimiter);
    if !head.is_empty() {
        return head;
    }
    if fallback_to_name {
        return physical_name.to_string();
    }
    String::new()
}
