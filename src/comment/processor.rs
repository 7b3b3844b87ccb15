//! Orchestration of parse, validate, sanitize and annotate for one comment.

use std::time::{Duration, Instant};

use tracing::warn;

use super::error::{ParseErrorKind, ProcessorError};
use super::json::JsonParser;
use super::legacy::LegacyParser;
use super::parser::{CommentParser, ParserRegistry};
use super::record::{CommentRecord, ObjectType};
use super::validator::{CommentValidator, ValidationProfile};
use super::yaml::YamlParser;

/// Behavior switches for a processor instance. Resolved once at
/// construction; later changes go through `set_config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingConfig {
    pub enable_validation: bool,
    pub enable_sanitization: bool,
    pub default_delimiter: String,
    pub fallback_to_legacy: bool,
    /// Strict mode propagates parse and validation errors; lenient mode
    /// swallows them and returns the closest partial record.
    pub strict_mode: bool,
    /// Deadline for a single `process` call. A zero budget times out
    /// immediately.
    pub processing_timeout_ms: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            enable_validation: true,
            enable_sanitization: true,
            default_delimiter: "|".to_string(),
            fallback_to_legacy: true,
            strict_mode: false,
            processing_timeout_ms: 1000,
        }
    }
}

/// External configuration source for processor construction. Keeps the
/// processor decoupled from the concrete config-file layer.
pub trait CommentConfigurator {
    fn enabled(&self) -> bool;
    fn json_enabled(&self) -> bool;
    fn yaml_enabled(&self) -> bool;
    /// One of `auto`, `json`, `yaml`, `legacy`. Unknown values behave as
    /// `auto`.
    fn preferred_format(&self) -> &str;
    fn max_depth(&self) -> usize;
    fn max_size(&self) -> usize;
    fn validation_enabled(&self) -> bool;
    fn sanitization_enabled(&self) -> bool;
    /// One of `default`, `strict`, `permissive`. Unknown values are passed
    /// through and resolve to the default profile.
    fn security_level(&self) -> &str;
    fn strict_mode(&self) -> bool;
    fn processing_timeout_ms(&self) -> u64;
    fn object_type_enabled(&self, object_type: &str) -> bool;
    fn logical_name_delimiter(&self) -> &str;

    /// Validation profile derived from the security level with the
    /// sanitization and validation toggles applied. Implementations with
    /// granular limits override this.
    fn validation_profile(&self) -> ValidationProfile {
        let mut profile = ValidationProfile::for_security_level(self.security_level());
        profile.enable_html_escape = self.sanitization_enabled();
        profile.enable_sql_injection_check = self.validation_enabled();
        profile
    }
}

/// One entry of a batch run.
#[derive(Debug, Clone)]
pub struct CommentInput {
    pub comment: String,
    pub delimiter: String,
    pub object_type: ObjectType,
}

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub parse_errors: usize,
    pub validation_errors: usize,
    pub timeouts: usize,
    pub elapsed: Duration,
}

/// Top-level entry point for a single comment: parse with fallback under a
/// deadline, validate, sanitize, and annotate with the object type.
///
/// Immutable during `process`, so one instance can serve parallel workers.
pub struct CommentProcessor {
    registry: ParserRegistry,
    validator: CommentValidator,
    config: ProcessingConfig,
}

impl CommentProcessor {
    pub fn new() -> Self {
        Self::with_config(ProcessingConfig::default())
    }

    pub fn with_config(config: ProcessingConfig) -> Self {
        let mut processor = Self {
            registry: ParserRegistry::new(),
            validator: CommentValidator::new(),
            config,
        };
        processor.register_default_parsers();
        processor
    }

    /// Build from an external configuration source, honoring the preferred
    /// format, parser bounds, security level and timeout. A disabled source
    /// yields the default processor.
    pub fn from_configurator(source: &impl CommentConfigurator) -> Self {
        if !source.enabled() {
            return Self::new();
        }

        let config = ProcessingConfig {
            enable_validation: source.validation_enabled(),
            enable_sanitization: source.sanitization_enabled(),
            default_delimiter: source.logical_name_delimiter().to_string(),
            fallback_to_legacy: true,
            strict_mode: source.strict_mode(),
            processing_timeout_ms: source.processing_timeout_ms(),
        };

        let mut processor = Self {
            registry: ParserRegistry::new(),
            validator: CommentValidator::with_profile(source.validation_profile()),
            config,
        };
        processor.register_parsers_from(source);
        processor
    }

    /// Default chain: JSON before YAML, legacy as the universal fallback.
    fn register_default_parsers(&mut self) {
        self.registry
            .register(Box::new(JsonParser::new().with_priority(10)));
        self.registry
            .register(Box::new(YamlParser::new().with_priority(15)));
        self.registry
            .register(Box::new(LegacyParser::new().with_priority(20)));
    }

    /// Registration order by preferred format. The promoted format gets the
    /// lowest priority number; legacy is always present except when it is
    /// explicitly the only format.
    fn register_parsers_from(&mut self, source: &impl CommentConfigurator) {
        let max_depth = source.max_depth();
        let max_size = source.max_size();
        let json = |priority| {
            Box::new(
                JsonParser::new()
                    .with_limits(max_depth, max_size)
                    .with_priority(priority),
            )
        };
        let yaml = |priority| {
            Box::new(
                YamlParser::new()
                    .with_limits(max_depth, max_size)
                    .with_priority(priority),
            )
        };

        match source.preferred_format() {
            "json" => {
                if source.json_enabled() {
                    self.registry.register(json(5));
                }
                if source.yaml_enabled() {
                    self.registry.register(yaml(15));
                }
            }
            "yaml" => {
                if source.yaml_enabled() {
                    self.registry.register(yaml(5));
                }
                if source.json_enabled() {
                    self.registry.register(json(10));
                }
            }
            "legacy" => {
                self.registry
                    .register(Box::new(LegacyParser::new().with_priority(5)));
                return;
            }
            _ => {
                if source.json_enabled() {
                    self.registry.register(json(10));
                }
                if source.yaml_enabled() {
                    self.registry.register(yaml(15));
                }
            }
        }

        self.registry
            .register(Box::new(LegacyParser::new().with_priority(20)));
    }

    fn deadline(&self) -> Result<Instant, ProcessorError> {
        let timeout_ms = self.config.processing_timeout_ms;
        if timeout_ms == 0 {
            return Err(ProcessorError::Timeout { timeout_ms });
        }
        Ok(Instant::now() + Duration::from_millis(timeout_ms))
    }

    fn timeout_error(&self) -> ProcessorError {
        ProcessorError::Timeout {
            timeout_ms: self.config.processing_timeout_ms,
        }
    }

    /// Parse the comment and annotate the result with the object type.
    /// Empty input yields the empty record without touching the registry.
    pub fn process(
        &self,
        comment: &str,
        delimiter: &str,
        object_type: ObjectType,
    ) -> Result<CommentRecord, ProcessorError> {
        if comment.is_empty() {
            return Ok(CommentRecord::default());
        }
        let deadline = self.deadline()?;
        self.process_until(comment, delimiter, object_type, deadline)
    }

    fn process_until(
        &self,
        comment: &str,
        delimiter: &str,
        object_type: ObjectType,
        deadline: Instant,
    ) -> Result<CommentRecord, ProcessorError> {
        let delimiter = if delimiter.is_empty() {
            self.config.default_delimiter.as_str()
        } else {
            delimiter
        };

        match self
            .registry
            .parse_with_deadline(comment, delimiter, Some(deadline))
        {
            Ok(mut record) => {
                record.set_metadata("object_type", object_type.as_str());
                Ok(record)
            }
            Err(err) if err.kind == ParseErrorKind::DeadlineExceeded => Err(self.timeout_error()),
            Err(err) => {
                if self.config.strict_mode {
                    return Err(err.into());
                }
                warn!(error = %err, "comment parsing failed, returning empty record");
                Ok(CommentRecord::from_source(comment))
            }
        }
    }

    /// `process` followed by validation and sanitization per the config.
    /// Validation failures propagate in strict mode; lenient mode falls back
    /// to the sanitized record (or the unvalidated one when sanitization is
    /// off).
    pub fn process_with_validation(
        &self,
        comment: &str,
        delimiter: &str,
        object_type: ObjectType,
    ) -> Result<CommentRecord, ProcessorError> {
        if comment.is_empty() {
            return Ok(CommentRecord::default());
        }
        let deadline = self.deadline()?;
        let mut record = self.process_until(comment, delimiter, object_type, deadline)?;

        if self.config.enable_validation {
            if self.config.enable_sanitization {
                match self.validator.validate_and_sanitize(&record) {
                    Ok(clean) => record = clean,
                    Err(err) => {
                        if self.config.strict_mode {
                            return Err(err.into());
                        }
                        warn!(error = %err, "validation failed, keeping sanitized record");
                        record = self.validator.sanitize(&record);
                    }
                }
            } else if let Err(err) = self.validator.validate(&record) {
                if self.config.strict_mode {
                    return Err(err.into());
                }
                warn!(error = %err, "validation failed, keeping unvalidated record");
            }
        } else if self.config.enable_sanitization {
            record = self.validator.sanitize(&record);
        }

        if Instant::now() >= deadline {
            return Err(self.timeout_error());
        }
        Ok(record)
    }

    /// Object-specific processing: the object name is recorded alongside
    /// the object type.
    pub fn process_for_object(
        &self,
        comment: &str,
        delimiter: &str,
        object_type: ObjectType,
        object_name: &str,
    ) -> Result<CommentRecord, ProcessorError> {
        let mut record = self.process_with_validation(comment, delimiter, object_type)?;
        if !record.source.is_empty() {
            record.set_metadata("object_name", object_name);
        }
        Ok(record)
    }

    pub fn process_table(
        &self,
        comment: &str,
        delimiter: &str,
        table_name: &str,
    ) -> Result<CommentRecord, ProcessorError> {
        self.process_for_object(comment, delimiter, ObjectType::Table, table_name)
    }

    pub fn process_column(
        &self,
        comment: &str,
        delimiter: &str,
        column_name: &str,
    ) -> Result<CommentRecord, ProcessorError> {
        self.process_for_object(comment, delimiter, ObjectType::Column, column_name)
    }

    pub fn process_index(
        &self,
        comment: &str,
        delimiter: &str,
        index_name: &str,
    ) -> Result<CommentRecord, ProcessorError> {
        self.process_for_object(comment, delimiter, ObjectType::Index, index_name)
    }

    pub fn process_constraint(
        &self,
        comment: &str,
        delimiter: &str,
        constraint_name: &str,
    ) -> Result<CommentRecord, ProcessorError> {
        self.process_for_object(comment, delimiter, ObjectType::Constraint, constraint_name)
    }

    pub fn process_trigger(
        &self,
        comment: &str,
        delimiter: &str,
        trigger_name: &str,
    ) -> Result<CommentRecord, ProcessorError> {
        self.process_for_object(comment, delimiter, ObjectType::Trigger, trigger_name)
    }

    /// Process a batch, one result per input.
    pub fn process_batch(
        &self,
        inputs: &[CommentInput],
    ) -> Vec<Result<CommentRecord, ProcessorError>> {
        inputs
            .iter()
            .map(|input| {
                self.process_with_validation(&input.comment, &input.delimiter, input.object_type)
            })
            .collect()
    }

    /// Batch processing with per-category error counts and wall time.
    pub fn process_batch_with_stats(
        &self,
        inputs: &[CommentInput],
    ) -> (Vec<Result<CommentRecord, ProcessorError>>, BatchStats) {
        let start = Instant::now();
        let results = self.process_batch(inputs);

        let mut stats = BatchStats {
            total: inputs.len(),
            ..BatchStats::default()
        };
        for result in &results {
            match result {
                Ok(_) => stats.succeeded += 1,
                Err(ProcessorError::Parse(_)) => {
                    stats.failed += 1;
                    stats.parse_errors += 1;
                }
                Err(ProcessorError::Validation(_)) => {
                    stats.failed += 1;
                    stats.validation_errors += 1;
                }
                Err(ProcessorError::Timeout { .. }) => {
                    stats.failed += 1;
                    stats.timeouts += 1;
                }
            }
        }
        stats.elapsed = start.elapsed();
        (results, stats)
    }

    /// Parser names in priority order.
    pub fn supported_formats(&self) -> Vec<String> {
        self.registry.parser_names()
    }

    pub fn register_parser(&mut self, parser: Box<dyn CommentParser>) {
        self.registry.register(parser);
    }

    pub fn clear_parsers(&mut self) {
        self.registry.clear();
    }

    /// Back to the default parser chain, validator and config.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.register_default_parsers();
        self.validator = CommentValidator::new();
        self.config = ProcessingConfig::default();
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    pub fn validator(&self) -> &CommentValidator {
        &self.validator
    }

    pub fn set_validator(&mut self, validator: CommentValidator) {
        self.validator = validator;
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ProcessingConfig) {
        self.config = config;
    }
}

impl Default for CommentProcessor {
    fn default() -> Self {
        Self::new()
    }
}
