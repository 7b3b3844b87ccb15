//! Parser contract and the priority-ordered registry with fallback.

use std::time::Instant;

use tracing::debug;

use super::error::{ParseError, ParseErrorKind};
use super::record::CommentRecord;

/// A single comment format.
///
/// Implementations are immutable after construction and safe to share across
/// threads. `can_parse` is a cheap probe that must not allocate proportionally
/// to the input; `parse` is pure.
pub trait CommentParser: Send + Sync {
    /// Stable identifier used in errors and diagnostics.
    fn name(&self) -> &str;

    /// Lower values are tried earlier.
    fn priority(&self) -> i32;

    fn can_parse(&self, comment: &str) -> bool;

    fn parse(&self, comment: &str, delimiter: &str) -> Result<CommentRecord, ParseError>;
}

/// Priority-sorted parser collection.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: Vec<Box<dyn CommentParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Insert stably by ascending priority: an equal-priority parser lands
    /// after the ones already registered.
    pub fn register(&mut self, parser: Box<dyn CommentParser>) {
        debug!(
            parser = parser.name(),
            priority = parser.priority(),
            "registering comment parser"
        );
        let position = self
            .parsers
            .iter()
            .position(|existing| parser.priority() < existing.priority())
            .unwrap_or(self.parsers.len());
        self.parsers.insert(position, parser);
    }

    pub fn clear(&mut self) {
        self.parsers.clear();
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    pub fn has_parser(&self, name: &str) -> bool {
        self.parsers.iter().any(|p| p.name() == name)
    }

    pub fn parser(&self, name: &str) -> Option<&dyn CommentParser> {
        self.parsers
            .iter()
            .find(|p| p.name() == name)
            .map(Box::as_ref)
    }

    /// Parser names in priority order.
    pub fn parser_names(&self) -> Vec<String> {
        self.parsers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Try parsers in priority order; the first success wins.
    ///
    /// On failure the most recent error is kept and the next parser is
    /// tried. When no parser accepts the input an UnsupportedFormat error is
    /// returned instead.
    pub fn parse_with_fallback(
        &self,
        comment: &str,
        delimiter: &str,
    ) -> Result<CommentRecord, ParseError> {
        self.parse_with_deadline(comment, delimiter, None)
    }

    /// Fallback chain with a cooperative deadline checked before each
    /// attempt. Expiry surfaces as a DeadlineExceeded parse error.
    pub fn parse_with_deadline(
        &self,
        comment: &str,
        delimiter: &str,
        deadline: Option<Instant>,
    ) -> Result<CommentRecord, ParseError> {
        if comment.is_empty() {
            return Ok(CommentRecord::from_source(comment));
        }

        let mut last_error: Option<ParseError> = None;

        for parser in &self.parsers {
            if let Some(deadline) = deadline
                && Instant::now() >= deadline
            {
                return Err(ParseError::new(
                    "registry",
                    comment,
                    "deadline elapsed during fallback chain",
                    ParseErrorKind::DeadlineExceeded,
                ));
            }

            if !parser.can_parse(comment) {
                continue;
            }

            match parser.parse(comment, delimiter) {
                Ok(mut record) => {
                    record.source = comment.to_string();
                    return Ok(record);
                }
                Err(err) => {
                    debug!(
                        parser = parser.name(),
                        error = %err,
                        "parser rejected comment, trying next"
                    );
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) => Err(err),
            None => Err(ParseError::new(
                "registry",
                comment,
                "no suitable parser found",
                ParseErrorKind::UnsupportedFormat,
            )),
        }
    }
}
