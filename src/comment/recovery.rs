//! Pluggable recovery from parse and validation failures, with an audit
//! trail kept by the reporter.

use std::collections::BTreeMap;

use anyhow::{Result, bail};

use super::error::{Category, Diagnostic, Severity, codes};
use super::legacy::LegacyParser;
use super::parser::CommentParser;
use super::record::CommentRecord;
use super::validator::CommentValidator;

/// What a strategy may work with: the raw comment text for reparsing, or an
/// already-parsed record for cleanup.
pub enum RecoveryContext<'a> {
    RawComment(&'a str),
    Record(&'a CommentRecord),
}

/// A recovery attempt keyed off the diagnostic's error code.
pub trait RecoveryStrategy: Send + Sync {
    fn can_recover(&self, diagnostic: &Diagnostic) -> bool;

    fn recover(
        &self,
        diagnostic: &Diagnostic,
        context: &RecoveryContext<'_>,
    ) -> Result<CommentRecord>;

    fn description(&self) -> &str;
}

/// Reparses the original text with the legacy parser when a structured
/// parser rejected it.
pub struct FallbackParsing {
    delimiter: String,
}

impl FallbackParsing {
    pub fn new() -> Self {
        Self {
            delimiter: "|".to_string(),
        }
    }

    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }
}

impl Default for FallbackParsing {
    fn default() -> Self {
        Self::new()
    }
}

impl RecoveryStrategy for FallbackParsing {
    fn can_recover(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.category == Category::Parsing
            && (diagnostic.code == codes::JSON_PARSE_FAILED
                || diagnostic.code == codes::YAML_PARSE_FAILED)
    }

    fn recover(
        &self,
        _diagnostic: &Diagnostic,
        context: &RecoveryContext<'_>,
    ) -> Result<CommentRecord> {
        match context {
            RecoveryContext::RawComment(raw) => Ok(LegacyParser::new()
                .parse(raw, &self.delimiter)?),
            RecoveryContext::Record(_) => {
                bail!("fallback parsing needs the raw comment text")
            }
        }
    }

    fn description(&self) -> &str {
        "fallback parsing: retry JSON/YAML failures with the legacy format"
    }
}

/// Runs the sanitizer, without revalidation, over a record flagged as
/// unsafe content.
pub struct SanitizationRecovery {
    validator: CommentValidator,
}

impl SanitizationRecovery {
    pub fn new() -> Self {
        Self {
            validator: CommentValidator::new(),
        }
    }

    pub fn with_validator(validator: CommentValidator) -> Self {
        Self { validator }
    }
}

impl Default for SanitizationRecovery {
    fn default() -> Self {
        Self::new()
    }
}

impl RecoveryStrategy for SanitizationRecovery {
    fn can_recover(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.category == Category::Validation && diagnostic.code == codes::UNSAFE_CONTENT
    }

    fn recover(
        &self,
        _diagnostic: &Diagnostic,
        context: &RecoveryContext<'_>,
    ) -> Result<CommentRecord> {
        match context {
            RecoveryContext::Record(record) => Ok(self.validator.sanitize(record)),
            RecoveryContext::RawComment(_) => {
                bail!("sanitization recovery needs a parsed record")
            }
        }
    }

    fn description(&self) -> &str {
        "sanitization: strip unsafe content from the parsed record"
    }
}

/// Ordered list of strategies; the first one that succeeds wins.
pub struct RecoveryManager {
    strategies: Vec<Box<dyn RecoveryStrategy>>,
}

impl RecoveryManager {
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(FallbackParsing::new()),
                Box::new(SanitizationRecovery::new()),
            ],
        }
    }

    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    pub fn add_strategy(&mut self, strategy: Box<dyn RecoveryStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn try_recover(
        &self,
        diagnostic: &Diagnostic,
        context: &RecoveryContext<'_>,
    ) -> Result<CommentRecord> {
        for strategy in &self.strategies {
            if !strategy.can_recover(diagnostic) {
                continue;
            }
            if let Ok(record) = strategy.recover(diagnostic, context) {
                return Ok(record);
            }
        }
        bail!(
            "no recovery strategy available for error: {}",
            diagnostic.code
        )
    }

    pub fn strategy_descriptions(&self) -> Vec<String> {
        self.strategies
            .iter()
            .map(|s| s.description().to_string())
            .collect()
    }
}

impl Default for RecoveryManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Totals kept by the reporter.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSummary {
    pub total: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_category: BTreeMap<Category, usize>,
    pub recovered: usize,
    /// The ten most recent diagnostics, rendered.
    pub recent: Vec<String>,
}

/// Collects diagnostics and records successful recoveries so reporters
/// retain an audit trail.
#[derive(Default)]
pub struct DiagnosticReporter {
    diagnostics: Vec<Diagnostic>,
    recovered: usize,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Record a successful recovery: an info-severity entry referencing the
    /// original error code.
    pub fn report_recovery(&mut self, original: &Diagnostic) {
        self.recovered += 1;

        let mut builder = Diagnostic::builder()
            .message(format!("recovered from error: {}", original.message))
            .severity(Severity::Info)
            .category(Category::Processing)
            .code(codes::RECOVERY_SUCCESS)
            .context("original_error", original.code);
        if let (Some(object_type), Some(object_name)) =
            (original.object_type, original.object_name.as_deref())
        {
            builder = builder.object_info(object_type, object_name);
        }
        self.diagnostics.push(builder.build());
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn recovered_count(&self) -> usize {
        self.recovered
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.recovered = 0;
    }

    pub fn summary(&self) -> DiagnosticSummary {
        let mut summary = DiagnosticSummary {
            total: self.diagnostics.len(),
            recovered: self.recovered,
            ..DiagnosticSummary::default()
        };

        for diagnostic in &self.diagnostics {
            *summary.by_severity.entry(diagnostic.severity).or_default() += 1;
            *summary.by_category.entry(diagnostic.category).or_default() += 1;
        }

        let start = self.diagnostics.len().saturating_sub(10);
        summary.recent = self.diagnostics[start..]
            .iter()
            .map(|d| d.to_string())
            .collect();

        summary
    }
}
