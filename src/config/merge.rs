use crate::config::types::*;

/// Trait for merging optional configuration values
pub trait Merge<T> {
    fn merge(self, other: T) -> T;
}

impl<T> Merge<Option<T>> for Option<T> {
    fn merge(self, other: Option<T>) -> Option<T> {
        other.or(self)
    }
}

impl Merge<ConfigInput> for ConfigInput {
    fn merge(self, other: ConfigInput) -> ConfigInput {
        ConfigInput {
            name: other.name.or(self.name),
            logical_name_delimiter: other.logical_name_delimiter.or(self.logical_name_delimiter),
            enhanced_comment: match (self.enhanced_comment, other.enhanced_comment) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(a), Some(b)) => Some(a.merge_with(b)),
            },
        }
    }
}

// Custom merge implementations for the nested sections
impl EnhancedCommentInput {
    pub fn merge_with(self, other: EnhancedCommentInput) -> EnhancedCommentInput {
        EnhancedCommentInput {
            enabled: other.enabled.or(self.enabled),
            parser: match (self.parser, other.parser) {
                (Some(a), Some(b)) => Some(a.merge_with(b)),
                (a, b) => b.or(a),
            },
            validation: match (self.validation, other.validation) {
                (Some(a), Some(b)) => Some(a.merge_with(b)),
                (a, b) => b.or(a),
            },
            processing: match (self.processing, other.processing) {
                (Some(a), Some(b)) => Some(a.merge_with(b)),
                (a, b) => b.or(a),
            },
        }
    }
}

impl ParserSectionInput {
    pub fn merge_with(self, other: ParserSectionInput) -> ParserSectionInput {
        ParserSectionInput {
            enable_json: other.enable_json.or(self.enable_json),
            enable_yaml: other.enable_yaml.or(self.enable_yaml),
            preferred_format: other.preferred_format.or(self.preferred_format),
            max_depth: other.max_depth.or(self.max_depth),
            max_size: other.max_size.or(self.max_size),
            fallback_to_legacy: other.fallback_to_legacy.or(self.fallback_to_legacy),
        }
    }
}

impl ValidationSectionInput {
    pub fn merge_with(self, other: ValidationSectionInput) -> ValidationSectionInput {
        ValidationSectionInput {
            enabled: other.enabled.or(self.enabled),
            enable_sanitization: other.enable_sanitization.or(self.enable_sanitization),
            security_level: other.security_level.or(self.security_level),
            max_logical_name_length: other
                .max_logical_name_length
                .or(self.max_logical_name_length),
            max_description_length: other.max_description_length.or(self.max_description_length),
            max_tag_count: other.max_tag_count.or(self.max_tag_count),
            enable_html_escape: other.enable_html_escape.or(self.enable_html_escape),
            enable_sql_injection_check: other
                .enable_sql_injection_check
                .or(self.enable_sql_injection_check),
            forbidden_words: other.forbidden_words.or(self.forbidden_words),
        }
    }
}

impl ProcessingSectionInput {
    pub fn merge_with(self, other: ProcessingSectionInput) -> ProcessingSectionInput {
        ProcessingSectionInput {
            strict_mode: other.strict_mode.or(self.strict_mode),
            processing_timeout_ms: other.processing_timeout_ms.or(self.processing_timeout_ms),
            enable_batch_processing: other
                .enable_batch_processing
                .or(self.enable_batch_processing),
            object_types: other.object_types.or(self.object_types),
        }
    }
}
