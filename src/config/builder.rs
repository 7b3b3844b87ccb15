use anyhow::{Result, bail};

use crate::comment::validator::ValidationProfile;
use crate::config::{merge::Merge, types::*};

pub struct ConfigBuilder {
    config_input: ConfigInput,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config_input: ConfigInput::default(),
        }
    }

    pub fn with_file(mut self, file_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(file_input);
        self
    }

    /// Later overrides win over earlier inputs, field by field.
    pub fn with_overrides(mut self, overrides: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(overrides);
        self
    }

    pub fn resolve(self) -> Result<Config> {
        let defaults = Config::default();

        let delimiter = self
            .config_input
            .logical_name_delimiter
            .clone()
            .unwrap_or_else(|| defaults.logical_name_delimiter.clone());
        if delimiter.is_empty() {
            bail!("logical name delimiter cannot be empty");
        }

        Ok(Config {
            name: self.config_input.name.clone().unwrap_or_default(),
            logical_name_delimiter: delimiter,
            enhanced_comment: self.resolve_enhanced_comment(&defaults.enhanced_comment),
        })
    }

    fn resolve_enhanced_comment(&self, defaults: &EnhancedComment) -> EnhancedComment {
        let input = self.config_input.enhanced_comment.as_ref();

        EnhancedComment {
            enabled: input
                .and_then(|e| e.enabled)
                .unwrap_or(defaults.enabled),
            parser: self.resolve_parser(&defaults.parser),
            validation: self.resolve_validation(&defaults.validation),
            processing: self.resolve_processing(&defaults.processing),
        }
    }

    fn resolve_parser(&self, defaults: &ParserSettings) -> ParserSettings {
        let parser_input = self
            .config_input
            .enhanced_comment
            .as_ref()
            .and_then(|e| e.parser.as_ref());

        ParserSettings {
            enable_json: parser_input
                .and_then(|p| p.enable_json)
                .unwrap_or(defaults.enable_json),
            enable_yaml: parser_input
                .and_then(|p| p.enable_yaml)
                .unwrap_or(defaults.enable_yaml),
            preferred_format: parser_input
                .and_then(|p| p.preferred_format.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.preferred_format.clone()),
            max_depth: parser_input
                .and_then(|p| p.max_depth)
                .unwrap_or(defaults.max_depth),
            max_size: parser_input
                .and_then(|p| p.max_size)
                .unwrap_or(defaults.max_size),
            fallback_to_legacy: parser_input
                .and_then(|p| p.fallback_to_legacy)
                .unwrap_or(defaults.fallback_to_legacy),
        }
    }

    /// The granular limits default from the preset selected by the security
    /// level, so a bare `securityLevel: strict` tightens everything at once.
    fn resolve_validation(&self, defaults: &ValidationSettings) -> ValidationSettings {
        let validation_input = self
            .config_input
            .enhanced_comment
            .as_ref()
            .and_then(|e| e.validation.as_ref());

        let security_level = validation_input
            .and_then(|v| v.security_level.as_ref())
            .cloned()
            .unwrap_or_else(|| defaults.security_level.clone());
        let preset = ValidationProfile::for_security_level(&security_level);

        ValidationSettings {
            enabled: validation_input
                .and_then(|v| v.enabled)
                .unwrap_or(defaults.enabled),
            enable_sanitization: validation_input
                .and_then(|v| v.enable_sanitization)
                .unwrap_or(defaults.enable_sanitization),
            max_logical_name_length: validation_input
                .and_then(|v| v.max_logical_name_length)
                .unwrap_or(preset.max_logical_name_length),
            max_description_length: validation_input
                .and_then(|v| v.max_description_length)
                .unwrap_or(preset.max_description_length),
            max_tag_count: validation_input
                .and_then(|v| v.max_tag_count)
                .unwrap_or(preset.max_tag_count),
            enable_html_escape: validation_input
                .and_then(|v| v.enable_html_escape)
                .unwrap_or(preset.enable_html_escape),
            enable_sql_injection_check: validation_input
                .and_then(|v| v.enable_sql_injection_check)
                .unwrap_or(preset.enable_sql_injection_check),
            forbidden_words: validation_input
                .and_then(|v| v.forbidden_words.as_ref())
                .cloned()
                .unwrap_or(preset.forbidden_words),
            security_level,
        }
    }

    fn resolve_processing(&self, defaults: &ProcessingSettings) -> ProcessingSettings {
        let processing_input = self
            .config_input
            .enhanced_comment
            .as_ref()
            .and_then(|e| e.processing.as_ref());

        ProcessingSettings {
            strict_mode: processing_input
                .and_then(|p| p.strict_mode)
                .unwrap_or(defaults.strict_mode),
            processing_timeout_ms: processing_input
                .and_then(|p| p.processing_timeout_ms)
                .unwrap_or(defaults.processing_timeout_ms),
            enable_batch_processing: processing_input
                .and_then(|p| p.enable_batch_processing)
                .unwrap_or(defaults.enable_batch_processing),
            object_types: processing_input
                .and_then(|p| p.object_types.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.object_types.clone()),
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
