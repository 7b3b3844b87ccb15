//! Configuration file driving processor and adapter construction.

use anyhow::Result;
use dbdoc::catalog::{Column, Commentable, DriverAdapter, Index, Schema, Table};
use dbdoc::comment::{CommentProcessor, ObjectType, ProcessorError};
use dbdoc::config::{ConfigBuilder, ConfigInput};

fn config_from_yaml(yaml: &str) -> Result<dbdoc::config::Config> {
    let input: ConfigInput = serde_yaml::from_str(yaml)?;
    ConfigBuilder::new().with_file(input).resolve()
}

#[test]
fn test_disabled_feature_builds_default_processor() -> Result<()> {
    let config = config_from_yaml("name: app")?;
    let processor = CommentProcessor::from_configurator(&config);
    assert_eq!(processor.supported_formats(), vec!["json", "yaml", "legacy"]);
    Ok(())
}

#[test]
fn test_preferred_format_json_from_file() -> Result<()> {
    let config = config_from_yaml(
        r#"
enhancedComment:
  enabled: true
  parser:
    preferredFormat: json
"#,
    )?;
    let processor = CommentProcessor::from_configurator(&config);
    assert_eq!(processor.supported_formats(), vec!["json", "yaml", "legacy"]);

    let record = processor
        .process_with_validation(r#"{"name": "設定経由"}"#, "|", ObjectType::Table)
        .unwrap();
    assert_eq!(record.logical_name, "設定経由");
    Ok(())
}

#[test]
fn test_legacy_only_configuration() -> Result<()> {
    let config = config_from_yaml(
        r#"
enhancedComment:
  enabled: true
  parser:
    preferredFormat: legacy
"#,
    )?;
    let processor = CommentProcessor::from_configurator(&config);
    assert_eq!(processor.supported_formats(), vec!["legacy"]);

    // JSON text is now parsed as a legacy comment.
    let record = processor
        .process(r#"{"name": "x"}"#, "|", ObjectType::Table)
        .unwrap();
    assert_eq!(record.logical_name, r#"{"name": "x"}"#);
    Ok(())
}

#[test]
fn test_custom_parser_bounds_from_file() -> Result<()> {
    let config = config_from_yaml(
        r#"
enhancedComment:
  enabled: true
  parser:
    maxDepth: 2
    maxSize: 64
"#,
    )?;
    let processor = CommentProcessor::from_configurator(&config);

    // Depth 3 exceeds the configured bound; legacy absorbs the text.
    let record = processor
        .process(r#"{"a": {"b": {"c": 1}}}"#, "|", ObjectType::Table)
        .unwrap();
    assert_eq!(record.logical_name, r#"{"a": {"b": {"c": 1}}}"#);
    Ok(())
}

#[test]
fn test_strict_security_level_from_file() -> Result<()> {
    let config = config_from_yaml(
        r#"
enhancedComment:
  enabled: true
  validation:
    securityLevel: strict
  processing:
    strictMode: true
"#,
    )?;
    let processor = CommentProcessor::from_configurator(&config);

    let result = processor.process_with_validation(
        r#"{"name": "where clause"}"#,
        "|",
        ObjectType::Table,
    );
    assert!(matches!(result, Err(ProcessorError::Validation(_))));
    Ok(())
}

#[test]
fn test_custom_delimiter_from_file() -> Result<()> {
    let config = config_from_yaml(
        r#"
logicalNameDelimiter: ":"
enhancedComment:
  enabled: true
"#,
    )?;
    let processor = CommentProcessor::from_configurator(&config);

    let record = processor
        .process("名前:説明", "", ObjectType::Column)
        .unwrap();
    assert_eq!(record.logical_name, "名前");
    assert_eq!(record.description, "説明");
    Ok(())
}

#[test]
fn test_object_type_filter_limits_walk() -> Result<()> {
    let config = config_from_yaml(
        r#"
enhancedComment:
  enabled: true
  processing:
    objectTypes: ["table"]
"#,
    )?;
    let mut adapter = DriverAdapter::from_configurator(&config);

    let mut schema = Schema::new("app");
    schema.tables.push(Table {
        comment: Some("テーブル|説明".to_string()),
        columns: vec![Column {
            comment: Some("カラム|説明".to_string()),
            ..Column::new("c")
        }],
        indexes: vec![Index {
            comment: Some("インデックス|説明".to_string()),
            ..Index::new("i")
        }],
        ..Table::new("t")
    });

    let stats = adapter.process_schema(&mut schema)?;

    assert_eq!(stats.processed_tables, 1);
    assert_eq!(stats.processed_columns, 0);
    assert_eq!(stats.processed_indexes, 0);

    let table = schema.find_table("t").unwrap();
    assert!(table.has_enhanced_comment());
    assert!(!table.columns[0].has_enhanced_comment());
    assert!(!table.indexes[0].has_enhanced_comment());
    Ok(())
}

#[test]
fn test_timeout_from_file_propagates() -> Result<()> {
    let config = config_from_yaml(
        r#"
enhancedComment:
  enabled: true
  processing:
    processingTimeout: 0
"#,
    )?;
    let processor = CommentProcessor::from_configurator(&config);

    let result = processor.process("a|b", "|", ObjectType::Table);
    assert!(matches!(result, Err(ProcessorError::Timeout { timeout_ms: 0 })));
    Ok(())
}

#[test]
fn test_adapter_from_configurator_end_to_end() -> Result<()> {
    let config = config_from_yaml(
        r#"
enhancedComment:
  enabled: true
  parser:
    preferredFormat: yaml
  processing:
    objectTypes: []
"#,
    )?;
    let mut adapter = DriverAdapter::from_configurator(&config);

    let mut schema = Schema::new("app");
    schema.tables.push(Table {
        comment: Some("name: 設定済み\ndescription: 全オブジェクト有効".to_string()),
        ..Table::new("configured")
    });

    let stats = adapter.process_schema(&mut schema)?;
    assert_eq!(stats.processed_tables, 1);
    assert_eq!(
        schema.tables[0].logical_name.as_deref(),
        Some("設定済み")
    );
    Ok(())
}
