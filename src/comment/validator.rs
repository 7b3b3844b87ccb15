//! Record validation and sanitization with configurable strictness.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::error::{ValidationError, ValidationErrorKind};
use super::record::CommentRecord;

/// Unicode letters, digits, punctuation, symbols and spaces.
const DEFAULT_ALLOWED_PATTERN: &str = r"^[\p{L}\p{N}\p{P}\p{S}\p{Zs}]+$";
/// Restricted punctuation set for hardened deployments.
const STRICT_ALLOWED_PATTERN: &str = r#"^[\p{L}\p{N}\p{Zs}\-_.,()\[\]{}:;'"!?]+$"#;

static SQL_INJECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(union\s+select|or\s+1\s*=\s*1|and\s+1\s*=\s*1|'|--|/\*|\*/|xp_|sp_|exec|execute|drop\s+table|delete\s+from|insert\s+into|update\s+set)",
    )
    .unwrap()
});

static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Limits applied by the validator. Lengths are counted in code points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationProfile {
    pub max_logical_name_length: usize,
    pub max_description_length: usize,
    pub max_tag_count: usize,
    pub max_tag_length: usize,
    pub max_metadata_entries: usize,
    pub max_metadata_key_length: usize,
    pub max_metadata_value_length: usize,
    /// `None` disables the character-pattern check.
    pub allowed_char_pattern: Option<String>,
    /// Case-insensitive substring matches.
    pub forbidden_words: Vec<String>,
    pub enable_html_escape: bool,
    pub enable_sql_injection_check: bool,
}

impl Default for ValidationProfile {
    fn default() -> Self {
        Self {
            max_logical_name_length: 100,
            max_description_length: 1000,
            max_tag_count: 20,
            max_tag_length: 50,
            max_metadata_entries: 50,
            max_metadata_key_length: 100,
            max_metadata_value_length: 500,
            allowed_char_pattern: Some(DEFAULT_ALLOWED_PATTERN.to_string()),
            forbidden_words: ["DROP", "DELETE", "INSERT", "UPDATE", "EXEC", "SCRIPT"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            enable_html_escape: true,
            enable_sql_injection_check: true,
        }
    }
}

impl ValidationProfile {
    pub fn strict() -> Self {
        Self {
            max_logical_name_length: 50,
            max_description_length: 500,
            max_tag_count: 10,
            max_tag_length: 30,
            max_metadata_entries: 20,
            max_metadata_key_length: 50,
            max_metadata_value_length: 200,
            allowed_char_pattern: Some(STRICT_ALLOWED_PATTERN.to_string()),
            forbidden_words: [
                "DROP", "DELETE", "INSERT", "UPDATE", "EXEC", "SCRIPT", "UNION", "SELECT", "FROM",
                "WHERE",
            ]
            .iter()
            .map(|w| w.to_string())
            .collect(),
            enable_html_escape: true,
            enable_sql_injection_check: true,
        }
    }

    pub fn permissive() -> Self {
        Self {
            max_logical_name_length: 200,
            max_description_length: 2000,
            max_tag_count: 50,
            max_tag_length: 100,
            max_metadata_entries: 100,
            max_metadata_key_length: 200,
            max_metadata_value_length: 1000,
            allowed_char_pattern: None,
            forbidden_words: Vec::new(),
            enable_html_escape: false,
            enable_sql_injection_check: false,
        }
    }

    /// Profile for a named security level. Unknown names fall back to the
    /// default profile.
    pub fn for_security_level(level: &str) -> Self {
        match level {
            "strict" => Self::strict(),
            "permissive" => Self::permissive(),
            _ => Self::default(),
        }
    }
}

/// Validates and sanitizes comment records. Compiled patterns are immutable
/// after construction, so a validator is safe to share across workers.
pub struct CommentValidator {
    profile: ValidationProfile,
    allowed_chars: Option<Regex>,
}

impl CommentValidator {
    pub fn new() -> Self {
        Self::with_profile(ValidationProfile::default())
    }

    pub fn strict() -> Self {
        Self::with_profile(ValidationProfile::strict())
    }

    pub fn permissive() -> Self {
        Self::with_profile(ValidationProfile::permissive())
    }

    pub fn with_profile(profile: ValidationProfile) -> Self {
        let allowed_chars = compile_allowed_pattern(&profile);
        Self {
            profile,
            allowed_chars,
        }
    }

    pub fn profile(&self) -> &ValidationProfile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: ValidationProfile) {
        self.allowed_chars = compile_allowed_pattern(&profile);
        self.profile = profile;
    }

    /// Check every field of the record against the profile limits.
    pub fn validate(&self, record: &CommentRecord) -> Result<(), ValidationError> {
        self.validate_logical_name(&record.logical_name)?;
        self.validate_description(&record.description)?;
        self.validate_tags(&record.tags)?;
        self.validate_metadata(record)?;
        Ok(())
    }

    /// Produce a cleaned copy: control characters removed, HTML escaped when
    /// enabled, whitespace runs collapsed, edges trimmed. Tags that sanitize
    /// to empty are dropped, as are metadata entries whose sanitized key or
    /// value is empty. The operation is idempotent.
    pub fn sanitize(&self, record: &CommentRecord) -> CommentRecord {
        let mut sanitized = record.clone();

        sanitized.logical_name = self.sanitize_string(&sanitized.logical_name);
        sanitized.description = self.sanitize_string(&sanitized.description);

        sanitized.tags = sanitized
            .tags
            .iter()
            .map(|tag| self.sanitize_string(tag))
            .filter(|tag| !tag.is_empty())
            .collect();

        sanitized.metadata = sanitized
            .metadata
            .iter()
            .map(|(key, value)| (self.sanitize_string(key), self.sanitize_string(value)))
            .filter(|(key, value)| !key.is_empty() && !value.is_empty())
            .collect();

        sanitized
    }

    /// Sanitize first, then validate the cleaned record.
    pub fn validate_and_sanitize(
        &self,
        record: &CommentRecord,
    ) -> Result<CommentRecord, ValidationError> {
        let sanitized = self.sanitize(record);
        self.validate(&sanitized)?;
        Ok(sanitized)
    }

    fn validate_logical_name(&self, logical_name: &str) -> Result<(), ValidationError> {
        if logical_name.is_empty() {
            return Ok(());
        }

        if logical_name.chars().count() > self.profile.max_logical_name_length {
            return Err(ValidationError::new(
                "logical_name",
                logical_name,
                format!(
                    "logical name too long (max: {})",
                    self.profile.max_logical_name_length
                ),
                ValidationErrorKind::TooLong,
            ));
        }

        self.validate_text(logical_name, "logical_name")
    }

    fn validate_description(&self, description: &str) -> Result<(), ValidationError> {
        if description.is_empty() {
            return Ok(());
        }

        if description.chars().count() > self.profile.max_description_length {
            return Err(ValidationError::new(
                "description",
                description,
                format!(
                    "description too long (max: {})",
                    self.profile.max_description_length
                ),
                ValidationErrorKind::TooLong,
            ));
        }

        self.validate_text(description, "description")
    }

    fn validate_tags(&self, tags: &[String]) -> Result<(), ValidationError> {
        if tags.is_empty() {
            return Ok(());
        }

        if tags.len() > self.profile.max_tag_count {
            return Err(ValidationError::new(
                "tags",
                &tags.join(","),
                format!("too many tags (max: {})", self.profile.max_tag_count),
                ValidationErrorKind::TooMany,
            ));
        }

        for (i, tag) in tags.iter().enumerate() {
            let field = format!("tags[{i}]");
            if tag.is_empty() {
                return Err(ValidationError::new(
                    field,
                    tag,
                    format!("empty tag at index {i}"),
                    ValidationErrorKind::Empty,
                ));
            }
            if tag.chars().count() > self.profile.max_tag_length {
                return Err(ValidationError::new(
                    field,
                    tag,
                    format!("tag too long (max: {})", self.profile.max_tag_length),
                    ValidationErrorKind::TooLong,
                ));
            }
            self.validate_text(tag, &format!("tags[{i}]"))?;
        }

        Ok(())
    }

    fn validate_metadata(&self, record: &CommentRecord) -> Result<(), ValidationError> {
        let metadata = &record.metadata;
        if metadata.is_empty() {
            return Ok(());
        }

        if metadata.len() > self.profile.max_metadata_entries {
            return Err(ValidationError::new(
                "metadata",
                &format!("{} entries", metadata.len()),
                format!(
                    "too many metadata entries (max: {})",
                    self.profile.max_metadata_entries
                ),
                ValidationErrorKind::TooMany,
            ));
        }

        for (key, value) in metadata {
            if key.is_empty() {
                return Err(ValidationError::new(
                    "metadata",
                    key,
                    "empty metadata key",
                    ValidationErrorKind::Empty,
                ));
            }
            if key.chars().count() > self.profile.max_metadata_key_length {
                return Err(ValidationError::new(
                    format!("metadata[{key}].key"),
                    key,
                    format!(
                        "metadata key too long (max: {})",
                        self.profile.max_metadata_key_length
                    ),
                    ValidationErrorKind::TooLong,
                ));
            }
            if value.chars().count() > self.profile.max_metadata_value_length {
                return Err(ValidationError::new(
                    format!("metadata[{key}].value"),
                    value,
                    format!(
                        "metadata value too long (max: {})",
                        self.profile.max_metadata_value_length
                    ),
                    ValidationErrorKind::TooLong,
                ));
            }
            self.validate_text(key, &format!("metadata[{key}].key"))?;
            self.validate_text(value, &format!("metadata[{key}].value"))?;
        }

        Ok(())
    }

    /// Character pattern, forbidden words, then injection scan.
    fn validate_text(&self, text: &str, field: &str) -> Result<(), ValidationError> {
        if text.is_empty() {
            return Ok(());
        }

        if let Some(allowed) = &self.allowed_chars
            && !allowed.is_match(text)
        {
            return Err(ValidationError::new(
                field,
                text,
                "contains characters outside the allowed set",
                ValidationErrorKind::InvalidCharacters,
            ));
        }

        if !self.profile.forbidden_words.is_empty() {
            let upper = text.to_uppercase();
            for word in &self.profile.forbidden_words {
                if upper.contains(&word.to_uppercase()) {
                    return Err(ValidationError::new(
                        field,
                        text,
                        format!("contains forbidden word: {word}"),
                        ValidationErrorKind::ForbiddenWord,
                    ));
                }
            }
        }

        if self.profile.enable_sql_injection_check && SQL_INJECTION_RE.is_match(text) {
            return Err(ValidationError::new(
                field,
                text,
                "matches a SQL injection pattern",
                ValidationErrorKind::SqlInjection,
            ));
        }

        Ok(())
    }

    fn sanitize_string(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let without_controls: String = text
            .chars()
            .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
            .collect();

        let escaped = if self.profile.enable_html_escape {
            escape_html(&without_controls)
        } else {
            without_controls
        };

        WHITESPACE_RUNS
            .replace_all(&escaped, " ")
            .trim()
            .to_string()
    }
}

impl Default for CommentValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_allowed_pattern(profile: &ValidationProfile) -> Option<Regex> {
    let pattern = profile.allowed_char_pattern.as_deref()?;
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            warn!(%err, pattern, "invalid allowed-character pattern, skipping character checks");
            None
        }
    }
}

/// HTML entity escaping that leaves already-escaped entities alone, so
/// repeated sanitization converges.
fn escape_html(text: &str) -> String {
    const ENTITIES: &[&str] = &["&amp;", "&lt;", "&gt;", "&quot;", "&#39;"];

    let mut result = String::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        let rest = &text[i..];
        let c = rest.chars().next().unwrap_or_default();
        match c {
            '&' => {
                if ENTITIES.iter().any(|entity| rest.starts_with(entity)) {
                    result.push('&');
                } else {
                    result.push_str("&amp;");
                }
            }
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            other => result.push(other),
        }
        i += c.len_utf8();
    }
    result
}
