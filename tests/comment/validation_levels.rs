//! The three security levels exercised through the whole pipeline.

use dbdoc::comment::{
    CommentProcessor, CommentValidator, ObjectType, ProcessingConfig, ProcessorError,
    ValidationProfile,
};

fn strict_processor() -> CommentProcessor {
    let mut processor = CommentProcessor::with_config(ProcessingConfig {
        strict_mode: true,
        ..ProcessingConfig::default()
    });
    processor.set_validator(CommentValidator::strict());
    processor
}

fn permissive_processor() -> CommentProcessor {
    let mut processor = CommentProcessor::new();
    processor.set_validator(CommentValidator::permissive());
    processor
}

#[test]
fn test_default_level_accepts_ordinary_comments() {
    let processor = CommentProcessor::new();
    let record = processor
        .process_with_validation(
            r#"{"name": "注文", "description": "注文履歴を保持する"}"#,
            "|",
            ObjectType::Table,
        )
        .unwrap();
    assert_eq!(record.logical_name, "注文");
}

#[test]
fn test_strict_level_rejects_sql_keywords() {
    let processor = strict_processor();
    for comment in [
        "select list|x",
        "from here|x",
        "where clause|x",
        "union of sets|x",
    ] {
        let result = processor.process_with_validation(comment, "|", ObjectType::Column);
        assert!(
            matches!(result, Err(ProcessorError::Validation(_))),
            "{comment} should fail under the strict profile"
        );
    }
}

#[test]
fn test_strict_level_length_limits() {
    let processor = strict_processor();

    let within = format!("{}|desc", "あ".repeat(50));
    assert!(processor
        .process_with_validation(&within, "|", ObjectType::Table)
        .is_ok());

    let beyond = format!("{}|desc", "あ".repeat(51));
    assert!(matches!(
        processor.process_with_validation(&beyond, "|", ObjectType::Table),
        Err(ProcessorError::Validation(_))
    ));
}

#[test]
fn test_permissive_level_accepts_hostile_content() {
    let processor = permissive_processor();
    let record = processor
        .process_with_validation(
            r#"{"name": "DROP TABLE users; -- 'injection'", "description": "<b>html</b>"}"#,
            "|",
            ObjectType::Table,
        )
        .unwrap();

    // No HTML escaping and no forbidden-word scanning either.
    assert_eq!(record.logical_name, "DROP TABLE users; -- 'injection'");
    assert_eq!(record.description, "<b>html</b>");
}

#[test]
fn test_profile_limits_are_ordered() {
    let strict = ValidationProfile::strict();
    let default = ValidationProfile::default();
    let permissive = ValidationProfile::permissive();

    assert!(strict.max_logical_name_length < default.max_logical_name_length);
    assert!(default.max_logical_name_length < permissive.max_logical_name_length);
    assert!(strict.max_description_length < default.max_description_length);
    assert!(strict.forbidden_words.len() > default.forbidden_words.len());
    assert!(permissive.forbidden_words.is_empty());
    assert!(permissive.allowed_char_pattern.is_none());
}

#[test]
fn test_lenient_default_sanitizes_instead_of_failing() {
    // The default processor is lenient: a record failing validation comes
    // back sanitized instead of erroring.
    let processor = CommentProcessor::new();
    let record = processor
        .process_with_validation("insert here|  padded  desc  ", "|", ObjectType::Column)
        .unwrap();

    assert_eq!(record.logical_name, "insert here");
    assert_eq!(record.description, "padded desc");
}

#[test]
fn test_validation_disabled_keeps_raw_fields() {
    let processor = CommentProcessor::with_config(ProcessingConfig {
        enable_validation: false,
        enable_sanitization: false,
        ..ProcessingConfig::default()
    });
    let record = processor
        .process_with_validation(
            r#"{"name": "  kept as-is  ", "description": "line\nbreak"}"#,
            "|",
            ObjectType::Table,
        )
        .unwrap();

    assert_eq!(record.logical_name, "  kept as-is  ");
    assert_eq!(record.description, "line\nbreak");
}
