use serde::{Deserialize, Serialize};

use crate::comment::processor::CommentConfigurator;
use crate::comment::validator::ValidationProfile;

/// Raw configuration input - all fields Optional for merging
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigInput {
    pub name: Option<String>,
    #[serde(rename = "logicalNameDelimiter")]
    pub logical_name_delimiter: Option<String>,
    #[serde(rename = "enhancedComment")]
    pub enhanced_comment: Option<EnhancedCommentInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EnhancedCommentInput {
    pub enabled: Option<bool>,
    pub parser: Option<ParserSectionInput>,
    pub validation: Option<ValidationSectionInput>,
    pub processing: Option<ProcessingSectionInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ParserSectionInput {
    #[serde(rename = "enableJSON")]
    pub enable_json: Option<bool>,
    #[serde(rename = "enableYAML")]
    pub enable_yaml: Option<bool>,
    #[serde(rename = "preferredFormat")]
    pub preferred_format: Option<String>,
    #[serde(rename = "maxDepth")]
    pub max_depth: Option<usize>,
    #[serde(rename = "maxSize")]
    pub max_size: Option<usize>,
    #[serde(rename = "fallbackToLegacy")]
    pub fallback_to_legacy: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValidationSectionInput {
    pub enabled: Option<bool>,
    #[serde(rename = "enableSanitization")]
    pub enable_sanitization: Option<bool>,
    #[serde(rename = "securityLevel")]
    pub security_level: Option<String>,
    #[serde(rename = "maxLogicalNameLength")]
    pub max_logical_name_length: Option<usize>,
    #[serde(rename = "maxDescriptionLength")]
    pub max_description_length: Option<usize>,
    #[serde(rename = "maxTagCount")]
    pub max_tag_count: Option<usize>,
    #[serde(rename = "enableHTMLEscape")]
    pub enable_html_escape: Option<bool>,
    #[serde(rename = "enableSQLInjectionCheck")]
    pub enable_sql_injection_check: Option<bool>,
    #[serde(rename = "forbiddenWords")]
    pub forbidden_words: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProcessingSectionInput {
    #[serde(rename = "strictMode")]
    pub strict_mode: Option<bool>,
    #[serde(rename = "processingTimeout")]
    pub processing_timeout_ms: Option<u64>,
    #[serde(rename = "enableBatchProcessing")]
    pub enable_batch_processing: Option<bool>,
    #[serde(rename = "objectTypes")]
    pub object_types: Option<Vec<String>>,
}

/// Resolved configuration with all defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub name: String,
    pub logical_name_delimiter: String,
    pub enhanced_comment: EnhancedComment,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnhancedComment {
    pub enabled: bool,
    pub parser: ParserSettings,
    pub validation: ValidationSettings,
    pub processing: ProcessingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserSettings {
    pub enable_json: bool,
    pub enable_yaml: bool,
    /// `auto`, `json`, `yaml` or `legacy`. Unknown values are kept as-is
    /// and behave as `auto` at registration time.
    pub preferred_format: String,
    pub max_depth: usize,
    pub max_size: usize,
    pub fallback_to_legacy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSettings {
    pub enabled: bool,
    pub enable_sanitization: bool,
    /// `default`, `strict` or `permissive`. Unknown values are kept as-is;
    /// profile resolution treats them as `default`.
    pub security_level: String,
    pub max_logical_name_length: usize,
    pub max_description_length: usize,
    pub max_tag_count: usize,
    pub enable_html_escape: bool,
    pub enable_sql_injection_check: bool,
    pub forbidden_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingSettings {
    pub strict_mode: bool,
    pub processing_timeout_ms: u64,
    pub enable_batch_processing: bool,
    /// Empty means every object type is enabled.
    pub object_types: Vec<String>,
}

impl CommentConfigurator for Config {
    fn enabled(&self) -> bool {
        self.enhanced_comment.enabled
    }

    fn json_enabled(&self) -> bool {
        self.enabled() && self.enhanced_comment.parser.enable_json
    }

    fn yaml_enabled(&self) -> bool {
        self.enabled() && self.enhanced_comment.parser.enable_yaml
    }

    fn preferred_format(&self) -> &str {
        &self.enhanced_comment.parser.preferred_format
    }

    fn max_depth(&self) -> usize {
        self.enhanced_comment.parser.max_depth
    }

    fn max_size(&self) -> usize {
        self.enhanced_comment.parser.max_size
    }

    fn validation_enabled(&self) -> bool {
        self.enabled() && self.enhanced_comment.validation.enabled
    }

    fn sanitization_enabled(&self) -> bool {
        self.enabled() && self.enhanced_comment.validation.enable_sanitization
    }

    fn security_level(&self) -> &str {
        &self.enhanced_comment.validation.security_level
    }

    fn strict_mode(&self) -> bool {
        self.enabled() && self.enhanced_comment.processing.strict_mode
    }

    fn processing_timeout_ms(&self) -> u64 {
        self.enhanced_comment.processing.processing_timeout_ms
    }

    fn object_type_enabled(&self, object_type: &str) -> bool {
        if !self.enabled() {
            return false;
        }
        let object_types = &self.enhanced_comment.processing.object_types;
        object_types.is_empty() || object_types.iter().any(|t| t == object_type)
    }

    fn logical_name_delimiter(&self) -> &str {
        &self.logical_name_delimiter
    }

    fn validation_profile(&self) -> ValidationProfile {
        let validation = &self.enhanced_comment.validation;
        let mut profile = ValidationProfile::for_security_level(&validation.security_level);
        profile.max_logical_name_length = validation.max_logical_name_length;
        profile.max_description_length = validation.max_description_length;
        profile.max_tag_count = validation.max_tag_count;
        profile.enable_html_escape = validation.enable_html_escape;
        profile.enable_sql_injection_check = validation.enable_sql_injection_check;
        profile.forbidden_words = validation.forbidden_words.clone();
        profile
    }
}
