use crate::comment::validator::ValidationProfile;
use crate::config::types::*;

impl Default for Config {
    fn default() -> Self {
        Self {
            name: String::new(),
            logical_name_delimiter: "|".to_string(),
            enhanced_comment: EnhancedComment::default(),
        }
    }
}

// EnhancedComment derives Default: the feature is opt-in, so `enabled`
// starts false while the sections carry their full defaults.

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            enable_json: true,
            enable_yaml: true,
            preferred_format: "auto".to_string(),
            max_depth: 5,
            max_size: 8192,
            fallback_to_legacy: true,
        }
    }
}

impl Default for ValidationSettings {
    fn default() -> Self {
        let profile = ValidationProfile::default();
        Self {
            enabled: true,
            enable_sanitization: true,
            security_level: "default".to_string(),
            max_logical_name_length: profile.max_logical_name_length,
            max_description_length: profile.max_description_length,
            max_tag_count: profile.max_tag_count,
            enable_html_escape: profile.enable_html_escape,
            enable_sql_injection_check: profile.enable_sql_injection_check,
            forbidden_words: profile.forbidden_words,
        }
    }
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            strict_mode: false,
            processing_timeout_ms: 1000,
            enable_batch_processing: true,
            object_types: ["table", "column", "index", "view", "constraint"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}
