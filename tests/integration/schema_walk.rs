//! Driver analysis followed by a full schema walk.

use anyhow::Result;
use dbdoc::catalog::adapter::driver_compatibility_warnings;
use dbdoc::catalog::{
    Column, Commentable, Constraint, DriverAdapter, DriverInfo, Index, Schema, Table, Trigger,
};
use dbdoc::comment::ProcessingConfig;
use dbdoc::driver::{Driver, analyze_with_enhanced_comments};

struct FixtureDriver;

impl Driver for FixtureDriver {
    fn analyze(&self, schema: &mut Schema) -> Result<()> {
        schema.tables.push(Table {
            comment: Some(
                r#"{"name": "ユーザー", "description": "システムユーザー管理テーブル", "tags": ["master", "auth"], "priority": 1}"#
                    .to_string(),
            ),
            columns: vec![
                Column {
                    comment: Some(
                        r#"{"name": "ユーザーID", "description": "一意識別子", "tags": ["pk", "serial"]}"#
                            .to_string(),
                    ),
                    ..Column::new("id")
                },
                Column {
                    comment: Some("ユーザー名|ログイン用の一意ユーザー名".to_string()),
                    ..Column::new("username")
                },
                Column {
                    comment: Some(
                        "description: メールアドレス\nvalidation: email\ntags:\n  - contact\n  - unique"
                            .to_string(),
                    ),
                    ..Column::new("email")
                },
            ],
            indexes: vec![Index {
                comment: Some(
                    r#"{"description": "ユーザー名一意インデックス", "tags": ["unique"]}"#.to_string(),
                ),
                ..Index::new("idx_users_username")
            }],
            constraints: vec![Constraint {
                comment: Some(r#"{"description": "ユーザーテーブル主キー"}"#.to_string()),
                ..Constraint::new("pk_users")
            }],
            triggers: vec![Trigger {
                comment: Some("description: 更新時刻の自動設定".to_string()),
                ..Trigger::new("trg_users_updated")
            }],
            ..Table::new("users")
        });

        schema.tables.push(Table {
            comment: Some("投稿|ユーザーの投稿を管理するテーブル".to_string()),
            columns: vec![Column {
                comment: None,
                ..Column::new("id")
            }],
            ..Table::new("posts")
        });

        Ok(())
    }

    fn info(&self) -> DriverInfo {
        DriverInfo {
            name: "postgres".to_string(),
            database_version: Some("16.2".to_string()),
        }
    }
}

#[test]
fn test_full_walk_attaches_records_everywhere() {
    let mut schema = Schema::new("app");
    let mut adapter = DriverAdapter::new(ProcessingConfig::default());

    let stats =
        analyze_with_enhanced_comments(&FixtureDriver, &mut schema, &mut adapter).unwrap();

    assert_eq!(stats.total_tables, 2);
    assert_eq!(stats.processed_tables, 2);
    assert_eq!(stats.total_columns, 4);
    assert_eq!(stats.processed_columns, 3);
    assert_eq!(stats.processed_indexes, 1);
    assert_eq!(stats.processed_constraints, 1);
    assert_eq!(stats.processed_triggers, 1);
    assert!(stats.processing_errors.is_empty());

    let users = schema.find_table("users").unwrap();
    assert_eq!(users.logical_name.as_deref(), Some("ユーザー"));
    assert_eq!(users.priority(), 1);
    assert_eq!(users.tags(), ["master", "auth"]);

    // Legacy-form column: logical name published, prefix stripped.
    let username = users.find_column("username").unwrap();
    assert_eq!(username.logical_name.as_deref(), Some("ユーザー名"));
    assert_eq!(username.comment.as_deref(), Some("ログイン用の一意ユーザー名"));

    // YAML column keeps extra keys as metadata.
    let email = users.find_column("email").unwrap();
    assert_eq!(
        email
            .metadata()
            .and_then(|m| m.get("validation"))
            .map(String::as_str),
        Some("email")
    );

    let posts = schema.find_table("posts").unwrap();
    assert_eq!(posts.logical_name.as_deref(), Some("投稿"));
    assert_eq!(posts.comment.as_deref(), Some("ユーザーの投稿を管理するテーブル"));

    assert_eq!(schema.driver.as_ref().map(|d| d.name.as_str()), Some("postgres"));
}

#[test]
fn test_walk_statistics_summary_shape() {
    let mut schema = Schema::new("app");
    let mut adapter = DriverAdapter::new(ProcessingConfig::default());
    let stats =
        analyze_with_enhanced_comments(&FixtureDriver, &mut schema, &mut adapter).unwrap();

    let summary = stats.summary();
    assert!(summary.contains("tables 2/2 (100.0%)"));
    assert!(summary.contains("columns 3/4 (75.0%)"));

    // Statistics serialize for downstream reporting.
    let json = serde_json::to_string(&stats).unwrap();
    assert!(json.contains("\"total_tables\":2"));
    assert!(json.contains("\"processing_errors\":[]"));
}

#[test]
fn test_processed_predicate_requires_attached_record() {
    let mut schema = Schema::new("app");
    schema.tables.push(Table::new("uncommented"));
    schema.tables.push(Table {
        comment: Some("名前|説明".to_string()),
        ..Table::new("commented")
    });

    let mut adapter = DriverAdapter::new(ProcessingConfig::default());
    let stats = adapter.process_schema(&mut schema).unwrap();

    assert_eq!(stats.total_tables, 2);
    assert_eq!(stats.processed_tables, 1);
    assert!(!schema.tables[0].has_enhanced_comment());
    assert!(schema.tables[1].has_enhanced_comment());
}

#[test]
fn test_fallback_records_expose_empty_descriptions() {
    // Broken JSON lands on the legacy parser, which stores the whole text
    // as a logical name. The accessors then answer from the attached
    // record: empty descriptions stay empty instead of echoing the raw
    // comment.
    let broken = "不正なJSON{";
    let mut schema = Schema::new("app");
    schema.tables.push(Table {
        comment: Some(broken.to_string()),
        columns: vec![Column {
            comment: Some(broken.to_string()),
            ..Column::new("payload")
        }],
        indexes: vec![Index {
            comment: Some(broken.to_string()),
            ..Index::new("idx_payload")
        }],
        constraints: vec![Constraint {
            comment: Some(broken.to_string()),
            ..Constraint::new("chk_payload")
        }],
        triggers: vec![Trigger {
            comment: Some(broken.to_string()),
            ..Trigger::new("trg_payload")
        }],
        ..Table::new("broken")
    });

    let mut adapter = DriverAdapter::new(ProcessingConfig::default());
    let stats = adapter.process_schema(&mut schema).unwrap();
    assert!(stats.processing_errors.is_empty());

    let table = schema.find_table("broken").unwrap();
    assert!(table.has_enhanced_comment());
    assert_eq!(table.description(), "");
    assert_eq!(table.columns[0].description(), "");
    assert_eq!(table.indexes[0].description(), "");
    assert_eq!(table.constraints[0].description(), "");
    assert_eq!(table.triggers[0].description(), "");
    assert_eq!(table.logical_name.as_deref(), Some(broken));
}

#[test]
fn test_compatibility_advisor() {
    let mut schema = Schema::new("app");
    let mut adapter = DriverAdapter::new(ProcessingConfig::default());
    analyze_with_enhanced_comments(&FixtureDriver, &mut schema, &mut adapter).unwrap();

    let warnings = driver_compatibility_warnings("sqlite", &schema);
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|w| w.contains("table comments")));

    assert!(driver_compatibility_warnings("postgres", &schema).is_empty());
    assert_eq!(
        driver_compatibility_warnings("mongodb", &schema),
        vec!["unknown driver: mongodb"]
    );
}

#[test]
fn test_schema_export_carries_enhanced_records() {
    let mut schema = Schema::new("app");
    let mut adapter = DriverAdapter::new(ProcessingConfig::default());
    analyze_with_enhanced_comments(&FixtureDriver, &mut schema, &mut adapter).unwrap();

    let json = serde_json::to_string_pretty(&schema).unwrap();
    assert!(json.contains("enhanced_comment"));
    assert!(json.contains("ユーザーID"));
    // The raw source text is internal and never exported.
    assert!(!json.contains("\"source\""));

    let restored: Schema = serde_json::from_str(&json).unwrap();
    let users = restored.find_table("users").unwrap();
    assert!(users.has_enhanced_comment());
}
