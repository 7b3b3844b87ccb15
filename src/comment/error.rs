//! Error taxonomy for the comment pipeline.
//!
//! Parsers and the validator return typed errors (`ParseError`,
//! `ValidationError`); the processor wraps them in `ProcessorError`. The
//! `Diagnostic` record is the reporting shape consumed by the adapter,
//! recovery strategies and reporters.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::time::SystemTime;

use thiserror::Error;

use super::record::ObjectType;

/// Stable error codes shared with reporters and recovery strategies.
pub mod codes {
    pub const JSON_PARSE_FAILED: &str = "E_JSON_PARSE_FAILED";
    pub const YAML_PARSE_FAILED: &str = "E_YAML_PARSE_FAILED";
    pub const LEGACY_PARSE_FAILED: &str = "E_LEGACY_PARSE_FAILED";
    pub const UNKNOWN_PARSER_FAILED: &str = "E_UNKNOWN_PARSER_FAILED";

    pub const VALIDATION_FAILED: &str = "E_VALIDATION_FAILED";
    pub const UNSAFE_CONTENT: &str = "E_UNSAFE_CONTENT";
    pub const INVALID_FORMAT: &str = "E_INVALID_FORMAT";

    pub const PROCESSING_TIMEOUT: &str = "E_PROCESSING_TIMEOUT";
    pub const MEMORY_LIMIT: &str = "E_MEMORY_LIMIT";
    pub const INTERNAL_ERROR: &str = "E_INTERNAL_ERROR";

    pub const INVALID_CONFIG: &str = "E_INVALID_CONFIG";
    pub const MISSING_CONFIG: &str = "E_MISSING_CONFIG";

    pub const INVALID_OBJECT_TYPE: &str = "E_INVALID_OBJECT_TYPE";
    pub const MISSING_OBJECT: &str = "E_MISSING_OBJECT";

    pub const RECOVERY_SUCCESS: &str = "E_RECOVERY_SUCCESS";
}

/// How far an input excerpt carried inside an error may grow.
const MAX_EXCERPT_CHARS: usize = 64;

fn excerpt_of(text: &str) -> String {
    if text.chars().count() <= MAX_EXCERPT_CHARS {
        return text.to_string();
    }
    let mut excerpt: String = text.chars().take(MAX_EXCERPT_CHARS).collect();
    excerpt.push('…');
    excerpt
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input does not look like the parser's format.
    InvalidFormat,
    /// No registered parser accepted the input.
    UnsupportedFormat,
    /// Input exceeds the byte-size bound.
    TooLong,
    /// Structural depth exceeds the configured bound.
    TooDeep,
    /// The underlying format parser rejected the input.
    Syntax,
    /// The processing deadline elapsed mid-parse.
    DeadlineExceeded,
}

/// Failure raised by a single parser or by the registry fallback chain.
#[derive(Debug, Error)]
#[error("{parser} parser failed: {reason} (comment: {excerpt:?})")]
pub struct ParseError {
    pub parser: String,
    pub excerpt: String,
    pub reason: String,
    pub kind: ParseErrorKind,
    #[source]
    pub cause: Option<Box<dyn StdError + Send + Sync>>,
}

impl ParseError {
    pub fn new(parser: &str, comment: &str, reason: impl Into<String>, kind: ParseErrorKind) -> Self {
        Self {
            parser: parser.to_string(),
            excerpt: excerpt_of(comment),
            reason: reason.into(),
            kind,
            cause: None,
        }
    }

    pub fn with_cause(
        parser: &str,
        comment: &str,
        reason: impl Into<String>,
        kind: ParseErrorKind,
        cause: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            cause: Some(Box::new(cause)),
            ..Self::new(parser, comment, reason, kind)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    TooLong,
    TooMany,
    Empty,
    InvalidCharacters,
    ForbiddenWord,
    SqlInjection,
}

impl ValidationErrorKind {
    /// Forbidden words and injection patterns classify as unsafe content;
    /// everything else is a plain constraint violation.
    pub fn is_unsafe(&self) -> bool {
        matches!(
            self,
            ValidationErrorKind::ForbiddenWord | ValidationErrorKind::SqlInjection
        )
    }
}

/// Constraint violation found while validating a record field.
#[derive(Debug, Error)]
#[error("validation failed for {field}: {reason} (value: {value:?})")]
pub struct ValidationError {
    pub field: String,
    pub value: String,
    pub reason: String,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        value: &str,
        reason: impl Into<String>,
        kind: ValidationErrorKind,
    ) -> Self {
        Self {
            field: field.into(),
            value: excerpt_of(value),
            reason: reason.into(),
            kind,
        }
    }

    pub fn code(&self) -> &'static str {
        if self.kind.is_unsafe() {
            codes::UNSAFE_CONTENT
        } else {
            codes::VALIDATION_FAILED
        }
    }
}

/// Top-level failure of a single `process` call.
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("failed to parse comment: {0}")]
    Parse(#[from] ParseError),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("comment processing timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Validation,
    Parsing,
    Processing,
    Configuration,
    Timeout,
    Memory,
    Schema,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Validation => "VALIDATION",
            Category::Parsing => "PARSING",
            Category::Processing => "PROCESSING",
            Category::Configuration => "CONFIGURATION",
            Category::Timeout => "TIMEOUT",
            Category::Memory => "MEMORY",
            Category::Schema => "SCHEMA",
        };
        f.write_str(label)
    }
}

/// Rich error record retained for reporting and recovery.
#[derive(Debug)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    pub category: Category,
    pub code: &'static str,
    pub context: BTreeMap<String, String>,
    pub timestamp: SystemTime,
    pub object_type: Option<ObjectType>,
    pub object_name: Option<String>,
    pub parser_name: Option<String>,
    pub source_comment: Option<String>,
    pub suggestions: Vec<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}] {} {}",
            self.severity, self.category, self.code, self.message
        )?;
        if let Some(name) = &self.object_name {
            write!(f, " (object: {name})")?;
        }
        if let Some(parser) = &self.parser_name {
            write!(f, " (parser: {parser})")?;
        }
        Ok(())
    }
}

impl StdError for Diagnostic {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

impl Diagnostic {
    pub fn builder() -> DiagnosticBuilder {
        DiagnosticBuilder::new()
    }

    /// Diagnostic for a parser that rejected its input. The code is chosen
    /// from the parser name so recovery strategies can match on it.
    pub fn parse_failure(parser: &str, comment: &str, cause: Option<ParseError>) -> Self {
        let code = match parser {
            "json" => codes::JSON_PARSE_FAILED,
            "yaml" => codes::YAML_PARSE_FAILED,
            "legacy" => codes::LEGACY_PARSE_FAILED,
            _ => codes::UNKNOWN_PARSER_FAILED,
        };

        let mut builder = Self::builder()
            .message(format!("{parser} parser failed to parse comment"))
            .severity(Severity::Error)
            .category(Category::Parsing)
            .code(code)
            .parser_name(parser)
            .source_comment(comment)
            .suggestion("check the comment format")
            .suggestion("enable fallback parsing");
        if let Some(cause) = cause {
            builder = builder.source(cause);
        }
        builder.build()
    }

    pub fn validation_failure(
        error: ValidationError,
        object_type: ObjectType,
        object_name: &str,
    ) -> Self {
        let code = error.code();
        Self::builder()
            .message(error.to_string())
            .severity(Severity::Warning)
            .category(Category::Validation)
            .code(code)
            .object_info(object_type, object_name)
            .suggestion("review the comment content")
            .source(error)
            .build()
    }

    pub fn timeout(timeout_ms: u64, object_type: ObjectType, object_name: &str) -> Self {
        Self::builder()
            .message(format!("processing timed out after {timeout_ms} ms"))
            .severity(Severity::Error)
            .category(Category::Timeout)
            .code(codes::PROCESSING_TIMEOUT)
            .object_info(object_type, object_name)
            .context("timeout_ms", timeout_ms.to_string())
            .suggestion("increase the processing timeout")
            .suggestion("reduce the comment complexity")
            .build()
    }

    pub fn configuration(message: impl Into<String>, config_key: &str) -> Self {
        Self::builder()
            .message(message)
            .severity(Severity::Critical)
            .category(Category::Configuration)
            .code(codes::INVALID_CONFIG)
            .context("config_key", config_key.to_string())
            .suggestion("check the configuration file")
            .build()
    }

    /// Map a processor failure onto a diagnostic, annotated with the object
    /// it occurred on.
    pub fn from_processor_error(
        error: ProcessorError,
        object_type: ObjectType,
        object_name: &str,
    ) -> Self {
        match error {
            ProcessorError::Parse(parse) => {
                let parser = parse.parser.clone();
                let comment = parse.excerpt.clone();
                let mut diagnostic = Self::parse_failure(&parser, &comment, Some(parse));
                diagnostic.object_type = Some(object_type);
                diagnostic.object_name = Some(object_name.to_string());
                diagnostic
            }
            ProcessorError::Validation(validation) => {
                Self::validation_failure(validation, object_type, object_name)
            }
            ProcessorError::Timeout { timeout_ms } => {
                Self::timeout(timeout_ms, object_type, object_name)
            }
        }
    }
}

/// Stepwise construction of a [`Diagnostic`].
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn new() -> Self {
        Self {
            diagnostic: Diagnostic {
                message: String::new(),
                severity: Severity::Error,
                category: Category::Processing,
                code: codes::INTERNAL_ERROR,
                context: BTreeMap::new(),
                timestamp: SystemTime::now(),
                object_type: None,
                object_name: None,
                parser_name: None,
                source_comment: None,
                suggestions: Vec::new(),
                source: None,
            },
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.diagnostic.message = message.into();
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.diagnostic.severity = severity;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.diagnostic.category = category;
        self
    }

    pub fn code(mut self, code: &'static str) -> Self {
        self.diagnostic.code = code;
        self
    }

    pub fn object_info(mut self, object_type: ObjectType, object_name: impl Into<String>) -> Self {
        self.diagnostic.object_type = Some(object_type);
        self.diagnostic.object_name = Some(object_name.into());
        self
    }

    pub fn parser_name(mut self, parser: impl Into<String>) -> Self {
        self.diagnostic.parser_name = Some(parser.into());
        self
    }

    pub fn source_comment(mut self, comment: &str) -> Self {
        self.diagnostic.source_comment = Some(excerpt_of(comment));
        self
    }

    pub fn context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.diagnostic.context.insert(key.into(), value.into());
        self
    }

    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.diagnostic.suggestions.push(suggestion.into());
        self
    }

    pub fn source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.diagnostic.source = Some(Box::new(source));
        self
    }

    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}

impl Default for DiagnosticBuilder {
    fn default() -> Self {
        Self::new()
    }
}
