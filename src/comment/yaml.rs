//! YAML comment payloads, e.g. `name: ユーザー\ntags:\n  - master`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::IgnoredAny;
use serde_yaml::{Mapping, Value};

use super::error::{ParseError, ParseErrorKind};
use super::json::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_SIZE};
use super::parser::CommentParser;
use super::record::CommentRecord;

const LOGICAL_NAME_KEYS: &[&str] = &[
    "name",
    "logical_name",
    "logicalName",
    "title",
    "label",
    "display_name",
];
const DESCRIPTION_KEYS: &[&str] = &[
    "description",
    "desc",
    "comment",
    "note",
    "summary",
    "details",
];
const CLAIMED_KEYS: &[&str] = &[
    "name",
    "logical_name",
    "logicalName",
    "title",
    "label",
    "display_name",
    "description",
    "desc",
    "comment",
    "note",
    "summary",
    "details",
    "tags",
    "priority",
    "deprecated",
];

/// A line that looks like a mapping entry, a sequence item, or a block
/// scalar introducer. Plain prose has none of these, so it falls through to
/// the legacy parser even though YAML would accept it as a bare string.
/// Keys are matched as ASCII words on purpose: `論理名|説明` style comments
/// must never be claimed by the YAML parser.
static YAML_CUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9A-Za-z_]+\s*:\s*.*|-\s+.*|\|\s*|>\s*)$").unwrap());

#[derive(Debug, Clone)]
pub struct YamlParser {
    priority: i32,
    max_depth: usize,
    max_size: usize,
}

impl YamlParser {
    pub fn new() -> Self {
        Self {
            priority: 15,
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

    fn looks_like_yaml(comment: &str) -> bool {
        comment
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .any(|line| YAML_CUE.is_match(line))
    }

    fn convert(&self, value: Value) -> CommentRecord {
        match value {
            Value::Mapping(map) => convert_mapping(&map),
            Value::Sequence(items) => match items.into_iter().next() {
                Some(Value::Mapping(map)) => convert_mapping(&map),
                _ => CommentRecord::default(),
            },
            Value::String(s) => CommentRecord {
                description: s,
                ..CommentRecord::default()
            },
            _ => CommentRecord::default(),
        }
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentParser for YamlParser {
    fn name(&self) -> &str {
        "yaml"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn can_parse(&self, comment: &str) -> bool {
        if comment.is_empty() || comment.len() > self.max_size {
            return false;
        }

        let trimmed = comment.trim();
        if trimmed.is_empty() || !Self::looks_like_yaml(trimmed) {
            return false;
        }

        serde_yaml::from_str::<IgnoredAny>(trimmed).is_ok()
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
        if !Self::looks_like_yaml(trimmed) {
            return Err(ParseError::new(
                self.name(),
                comment,
                "no YAML structure detected",
                ParseErrorKind::InvalidFormat,
            ));
        }

        let value: Value = serde_yaml::from_str(trimmed).map_err(|err| {
            ParseError::with_cause(
                self.name(),
                comment,
                "YAML deserialization failed",
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

fn convert_mapping(map: &Mapping) -> CommentRecord {
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

    if let Some(value) = map.get("priority")
        && let Some(priority) = coerce_priority(value)
    {
        record.priority = priority;
    }

    if let Some(value) = map.get("deprecated") {
        record.deprecated = coerce_deprecated(value);
    }

    for (key, value) in map {
        let key = match key {
            Value::String(s) => s.clone(),
            other => scalar_to_string(other),
        };
        if CLAIMED_KEYS.contains(&key.as_str()) {
            continue;
        }
        record.metadata.insert(key, scalar_to_string(value));
    }

    record
}

fn coerce_tags(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Sequence(items) => Some(items.iter().map(scalar_to_string).collect()),
        Value::String(s) if s.contains(',') => {
            Some(s.split(',').map(|part| part.trim().to_string()).collect())
        }
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}

/// Integers, whole-valued floats, and base-10 integer strings. Anything
/// fractional or unparseable leaves the priority unset.
fn coerce_priority(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_deprecated(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => {
            let lowered = s.to_lowercase();
            lowered == "true" || lowered == "yes" || s == "1"
        }
        _ => false,
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn depth_of(value: &Value) -> usize {
    match value {
        Value::Mapping(map) => 1 + map.values().map(depth_of).max().unwrap_or(0),
        Value::Sequence(items) => 1 + items.iter().map(depth_of).max().unwrap_or(0),
        Value::Tagged(tagged) => depth_of(&tagged.value),
        _ => 1,
    }
}

/// Whether the default YAML parser would accept the comment.
pub fn is_valid_yaml(comment: &str) -> bool {
    YamlParser::new().can_parse(comment)
}

/// One-shot parse with the default parser. No validation is applied.
pub fn quick_parse_yaml(comment: &str) -> Result<CommentRecord, ParseError> {
    YamlParser::new().parse(comment, "")
}
