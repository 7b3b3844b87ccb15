//! End-to-end scenarios through the full processor pipeline.

use dbdoc::comment::{CommentProcessor, ObjectType, ProcessingConfig, ProcessorError};

fn processor() -> CommentProcessor {
    CommentProcessor::new()
}

#[test]
fn test_json_column_comment() {
    let record = processor()
        .process_with_validation(
            r#"{"name":"ユーザー名","description":"表示名","tags":["PK","重要"],"priority":1}"#,
            "|",
            ObjectType::Column,
        )
        .unwrap();

    assert_eq!(record.logical_name, "ユーザー名");
    assert_eq!(record.description, "表示名");
    assert_eq!(record.tags, vec!["PK", "重要"]);
    assert_eq!(record.priority, 1);
    assert_eq!(record.metadata_value("object_type"), Some("column"));
}

#[test]
fn test_yaml_table_comment() {
    let record = processor()
        .process_with_validation(
            "name: 投稿\ndescription: 本文\ntags:\n  - draft",
            "|",
            ObjectType::Table,
        )
        .unwrap();

    assert_eq!(record.logical_name, "投稿");
    assert_eq!(record.description, "本文");
    assert_eq!(record.tags, vec!["draft"]);
    assert_eq!(record.metadata_value("object_type"), Some("table"));
}

#[test]
fn test_legacy_column_comment() {
    let record = processor()
        .process_with_validation("論理名|説明文", "|", ObjectType::Column)
        .unwrap();

    assert_eq!(record.logical_name, "論理名");
    assert_eq!(record.description, "説明文");
}

#[test]
fn test_legacy_escaped_delimiter() {
    let record = processor()
        .process_with_validation(r"論理名\|エスケープ|説明", "|", ObjectType::Column)
        .unwrap();

    assert_eq!(record.logical_name, "論理名|エスケープ");
    assert_eq!(record.description, "説明");
}

#[test]
fn test_unterminated_json_falls_back_to_legacy() {
    // Parse-level fallback: sanitization stays out of the picture so the
    // captured logical name is the raw text, quotes included.
    let record = processor()
        .process(r#"{"name":"A""#, "|", ObjectType::Column)
        .unwrap();

    assert_eq!(record.logical_name, r#"{"name":"A""#);
    assert_eq!(record.description, "");
}

#[test]
fn test_empty_comment_is_empty_record() {
    let record = processor()
        .process_with_validation("", "|", ObjectType::Table)
        .unwrap();

    assert!(record.is_empty());
    assert_eq!(record.source, "");
}

#[test]
fn test_source_preservation_across_formats() {
    let inputs = [
        r#"{"name": "json"}"#,
        "name: yaml",
        "legacy|comment",
        "plain text",
    ];
    let processor = processor();

    for input in inputs {
        let record = processor
            .process(input, "|", ObjectType::Table)
            .unwrap();
        assert_eq!(record.source, input, "source must be preserved verbatim");
    }
}

#[test]
fn test_fallback_is_deterministic() {
    let processor = processor();
    let input = r#"{"name":"A""#;

    let first = processor.process(input, "|", ObjectType::Column).unwrap();
    let second = processor.process(input, "|", ObjectType::Column).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_strict_lenient_contract() {
    let strict = CommentProcessor::with_config(ProcessingConfig {
        strict_mode: true,
        ..ProcessingConfig::default()
    });
    let lenient = CommentProcessor::new();

    // A comment that parses but fails validation in both modes.
    let input = "DROP TABLE users|cleanup";

    let strict_result = strict.process_with_validation(input, "|", ObjectType::Table);
    assert!(matches!(strict_result, Err(ProcessorError::Validation(_))));

    let lenient_result = lenient.process_with_validation(input, "|", ObjectType::Table);
    assert!(lenient_result.is_ok());
}

#[test]
fn test_object_type_annotation_for_all_kinds() {
    let processor = processor();
    for object_type in [
        ObjectType::Table,
        ObjectType::Column,
        ObjectType::Index,
        ObjectType::View,
        ObjectType::Constraint,
        ObjectType::Trigger,
        ObjectType::Function,
        ObjectType::Enum,
    ] {
        let record = processor
            .process(r#"{"name": "x"}"#, "|", object_type)
            .unwrap();
        assert_eq!(
            record.metadata_value("object_type"),
            Some(object_type.as_str())
        );
    }
}

#[test]
fn test_mixed_format_batch() {
    use dbdoc::comment::CommentInput;

    let inputs: Vec<CommentInput> = [
        (r#"{"name": "JSONテーブル"}"#, ObjectType::Table),
        ("name: YAMLカラム", ObjectType::Column),
        ("従来|形式", ObjectType::Index),
        ("", ObjectType::Trigger),
    ]
    .into_iter()
    .map(|(comment, object_type)| CommentInput {
        comment: comment.to_string(),
        delimiter: "|".to_string(),
        object_type,
    })
    .collect();

    let (results, stats) = processor().process_batch_with_stats(&inputs);

    assert_eq!(stats.total, 4);
    assert_eq!(stats.succeeded, 4);
    assert_eq!(stats.failed, 0);
    assert_eq!(
        results[0].as_ref().unwrap().logical_name,
        "JSONテーブル"
    );
    assert_eq!(results[1].as_ref().unwrap().logical_name, "YAMLカラム");
    assert_eq!(results[2].as_ref().unwrap().logical_name, "従来");
    assert!(results[3].as_ref().unwrap().is_empty());
}

#[test]
fn test_sanitization_applies_in_pipeline() {
    let record = processor()
        .process_with_validation(
            r#"{"name": "  padded  ", "description": "multi\nline"}"#,
            "|",
            ObjectType::Table,
        )
        .unwrap();

    assert_eq!(record.logical_name, "padded");
    assert_eq!(record.description, "multi line");
}
