//! Recovery strategies and the diagnostic audit trail end to end.

use dbdoc::catalog::{DriverAdapter, Schema, Table};
use dbdoc::comment::error::codes;
use dbdoc::comment::{
    Category, CommentProcessor, CommentRecord, Diagnostic, JsonParser, ProcessingConfig,
    RecoveryContext, RecoveryManager, RecoveryStrategy, Severity,
};

fn json_only_strict_processor() -> CommentProcessor {
    let mut processor = CommentProcessor::with_config(ProcessingConfig {
        strict_mode: true,
        ..ProcessingConfig::default()
    });
    processor.clear_parsers();
    processor.register_parser(Box::new(JsonParser::new()));
    processor
}

#[test]
fn test_walk_failures_are_recovered_and_audited() {
    let mut adapter =
        DriverAdapter::with_processor(json_only_strict_processor(), ProcessingConfig::default());

    // Valid JSON shape, but one level too deep for the default bound.
    let deep = r#"{"l1": {"l2": {"l3": {"l4": {"l5": 1}}}}}"#;
    let mut schema = Schema::new("app");
    schema.tables.push(Table {
        comment: Some(deep.to_string()),
        ..Table::new("nested")
    });
    schema.tables.push(Table {
        comment: Some(r#"{"name": "正常"}"#.to_string()),
        ..Table::new("healthy")
    });

    let stats = adapter.process_schema(&mut schema).unwrap();

    // The failure was recovered through legacy parsing, so it is not an
    // error; the healthy table processed normally.
    assert!(stats.processing_errors.is_empty());
    assert_eq!(stats.processed_tables, 2);
    assert_eq!(adapter.reporter().recovered_count(), 1);

    let audit = &adapter.reporter().diagnostics()[0];
    assert_eq!(audit.code, codes::RECOVERY_SUCCESS);
    assert_eq!(audit.severity, Severity::Info);
    assert_eq!(
        audit.context.get("original_error").map(String::as_str),
        Some(codes::JSON_PARSE_FAILED)
    );
    assert_eq!(audit.object_name.as_deref(), Some("nested"));
}

#[test]
fn test_unrecoverable_failures_are_reported() {
    let config = ProcessingConfig {
        processing_timeout_ms: 0,
        ..ProcessingConfig::default()
    };
    let mut adapter = DriverAdapter::new(config);

    let mut schema = Schema::new("app");
    schema.tables.push(Table {
        comment: Some("名前|説明".to_string()),
        ..Table::new("t")
    });

    let stats = adapter.process_schema(&mut schema).unwrap();

    assert_eq!(stats.processing_errors.len(), 1);
    assert!(stats.processing_errors[0].contains(codes::PROCESSING_TIMEOUT));

    let summary = adapter.reporter().summary();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.recovered, 0);
    assert_eq!(summary.by_category.get(&Category::Timeout), Some(&1));
}

#[test]
fn test_custom_strategy_joins_the_chain() {
    struct TimeoutPlaceholder;

    impl RecoveryStrategy for TimeoutPlaceholder {
        fn can_recover(&self, diagnostic: &Diagnostic) -> bool {
            diagnostic.code == codes::PROCESSING_TIMEOUT
        }

        fn recover(
            &self,
            _diagnostic: &Diagnostic,
            context: &RecoveryContext<'_>,
        ) -> anyhow::Result<CommentRecord> {
            match context {
                RecoveryContext::RawComment(raw) => Ok(CommentRecord {
                    description: "processing skipped".to_string(),
                    source: raw.to_string(),
                    ..CommentRecord::default()
                }),
                RecoveryContext::Record(record) => Ok((*record).clone()),
            }
        }

        fn description(&self) -> &str {
            "placeholder for timed-out comments"
        }
    }

    let config = ProcessingConfig {
        processing_timeout_ms: 0,
        ..ProcessingConfig::default()
    };
    let mut adapter = DriverAdapter::new(config);
    adapter.add_recovery_strategy(Box::new(TimeoutPlaceholder));

    let mut schema = Schema::new("app");
    schema.tables.push(Table {
        comment: Some("名前|説明".to_string()),
        ..Table::new("slow")
    });

    let stats = adapter.process_schema(&mut schema).unwrap();

    assert!(stats.processing_errors.is_empty());
    assert_eq!(adapter.reporter().recovered_count(), 1);
    assert_eq!(
        schema.tables[0]
            .enhanced_comment
            .as_ref()
            .map(|r| r.description.as_str()),
        Some("processing skipped")
    );
}

#[test]
fn test_manager_descriptions_list_builtin_strategies() {
    let manager = RecoveryManager::new();
    let descriptions = manager.strategy_descriptions();
    assert_eq!(descriptions.len(), 2);
    assert!(descriptions[0].contains("fallback parsing"));
    assert!(descriptions[1].contains("sanitization"));
}
