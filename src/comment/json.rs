//! JSON comment payloads, e.g. `{"name": "ユーザー", "tags": ["master"]}`.

use serde::de::IgnoredAny;
use serde_json::Value;

use super::error::{ParseError, ParseErrorKind};
use super::parser::CommentParser;
use super::record::CommentRecord;

pub const DEFAULT_MAX_DEPTH: usize = 5;
pub const DEFAULT_MAX_SIZE: usize = 8192;

const LOGICAL_NAME_KEYS: &[&str] = &["name", "logical_name", "logicalName", "title", "label"];
const DESCRIPTION_KEYS: &[&str] = &["description", "desc", "comment", "note", "summary"];
const CLAIMED_KEYS: &[&str] = &[
    "name",
    "logical_name",
    "logicalName",
    "title",
    "label",
    "description",
    "desc",
    "comment",
    "note",
    "summary",
    "tags",
    "priority",
    "deprecated",
];

#[derive(Debug, Clone)]
pub struct JsonParser {
    priority: i32,
    max_depth: usize,
    max_size: usize,
}

impl JsonParser {
    pub fn new() -> Self {
        Self {
            priority: 10,
            max_depth: DEFAULT_MAX_DEPTH,
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    pub fn with_limits(mut self, max_depth: usize, max_size: usize) -> Self {
        self.max_depth = max_depth;
        self.max_size = max_size;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn has_json_shape(trimmed: &str) -> bool {
        if trimmed.chars().count() < 2 {
            return false;
        }
        (trimmed.starts_with('{') && trimmed.ends_with('}'))
            || (trimmed.starts_with('[') && trimmed.ends_with(']'))
    }

    fn convert(&self, value: Value) -> CommentRecord {
        match value {
            Value::Object(map) => convert_map(map),
            Value::Array(items) => match items.into_iter().next() {
                Some(Value::Object(map)) => convert_map(map),
                _ => CommentRecord::default(),
            },
            _ => CommentRecord::default(),
        }
    }
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentParser for JsonParser {
    fn name(&self) -> &str {
        "json"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn can_parse(&self, comment: &str) -> bool {
        if comment.is_empty() || comment.len() > self.max_size {
            return false;
        }

        let trimmed = comment.trim();
        if !Self::has_json_shape(trimmed) {
            return false;
        }

        // IgnoredAny validates syntax without building a value tree.
        serde_json::from_str::<IgnoredAny>(trimmed).is_ok()
    }

    fn parse(&self, comment: &str, _delimiter: &str) -> Result<CommentRecord, ParseError> {
        if comment.is_empty() {
            return Ok(CommentRecord::from_source(comment));
        }

        if comment.len() > self.max_size {
            return Err(ParseError::new(
                self.name(),
                comment,
                format!("comment exceeds {} bytes", self.max_size),
                ParseErrorKind::TooLong,
            ));
        }

        let trimmed = comment.trim();
        if !Self::has_json_shape(trimmed) {
            return Err(ParseError::new(
                self.name(),
                comment,
                "not a valid JSON shape",
                ParseErrorKind::InvalidFormat,
            ));
        }

        let value: Value = serde_json::from_str(trimmed).map_err(|err| {
            ParseError::with_cause(
                self.name(),
                comment,
                "JSON deserialization failed",
                ParseErrorKind::Syntax,
                err,
            )
        })?;

        if depth_of(&value) > self.max_depth {
            return Err(ParseError::new(
                self.name(),
                comment,
                format!("structure deeper than {} levels", self.max_depth),
                ParseErrorKind::TooDeep,
            ));
        }

        let mut record = self.convert(value);
        record.source = comment.to_string();
        Ok(record)
    }
}

fn convert_map(map: serde_json::Map<String, Value>) -> CommentRecord {
    let mut record = CommentRecord::default();

    for key in LOGICAL_NAME_KEYS {
        if let Some(Value::String(s)) = map.get(*key)
            && !s.is_empty()
        {
            record.logical_name = s.clone();
            break;
        }
    }

    for key in DESCRIPTION_KEYS {
        if let Some(Value::String(s)) = map.get(*key)
            && !s.is_empty()
        {
            record.description = s.clone();
            break;
        }
    }

    if let Some(value) = map.get("tags")
        && let Some(tags) = coerce_tags(value)
    {
        record.tags = tags;
    }

    if let Some(priority) = map.get("priority").and_then(Value::as_i64) {
        record.priority = priority;
    }

    if let Some(deprecated) = map.get("deprecated").and_then(Value::as_bool) {
        record.deprecated = deprecated;
    }

    for (key, value) in &map {
        if CLAIMED_KEYS.contains(&key.as_str()) {
            continue;
        }
        record
            .metadata
            .insert(key.clone(), scalar_to_string(value));
    }

    record
}

fn coerce_tags(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().map(scalar_to_string).collect()),
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn depth_of(value: &Value) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(depth_of).max().unwrap_or(0),
        Value::Array(items) => 1 + items.iter().map(depth_of).max().unwrap_or(0),
        _ => 1,
    }
}

/// Whether the default JSON parser would accept the comment.
pub fn is_valid_json(comment: &str) -> bool {
    JsonParser::new().can_parse(comment)
}

/// One-shot parse with the default parser. No validation is applied.
pub fn quick_parse_json(comment: &str) -> Result<CommentRecord, ParseError> {
    JsonParser::new().parse(comment, "")
}
