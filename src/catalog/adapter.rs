//! Walks a schema tree and applies the comment processor to every
//! commentable object, collecting statistics along the way.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, warn};

use super::Schema;
use super::comments::Commentable;
use crate::comment::error::{Diagnostic, ProcessorError};
use crate::comment::processor::{CommentConfigurator, CommentProcessor, ProcessingConfig};
use crate::comment::record::ObjectType;
use crate::comment::recovery::{
    DiagnosticReporter, RecoveryContext, RecoveryManager, RecoveryStrategy,
};

const WALKED_OBJECT_TYPES: [ObjectType; 6] = [
    ObjectType::Table,
    ObjectType::View,
    ObjectType::Column,
    ObjectType::Index,
    ObjectType::Constraint,
    ObjectType::Trigger,
];

/// Per-kind totals from a schema walk. An object counts as processed when a
/// non-empty enhanced record is attached to it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingStatistics {
    pub total_tables: usize,
    pub processed_tables: usize,
    pub total_columns: usize,
    pub processed_columns: usize,
    pub total_indexes: usize,
    pub processed_indexes: usize,
    pub total_constraints: usize,
    pub processed_constraints: usize,
    pub total_triggers: usize,
    pub processed_triggers: usize,
    pub processing_errors: Vec<String>,
}

impl ProcessingStatistics {
    fn rate(processed: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        processed as f64 / total as f64 * 100.0
    }

    pub fn table_rate(&self) -> f64 {
        Self::rate(self.processed_tables, self.total_tables)
    }

    pub fn column_rate(&self) -> f64 {
        Self::rate(self.processed_columns, self.total_columns)
    }

    pub fn index_rate(&self) -> f64 {
        Self::rate(self.processed_indexes, self.total_indexes)
    }

    pub fn constraint_rate(&self) -> f64 {
        Self::rate(self.processed_constraints, self.total_constraints)
    }

    pub fn trigger_rate(&self) -> f64 {
        Self::rate(self.processed_triggers, self.total_triggers)
    }

    pub fn overall_rate(&self) -> f64 {
        let total = self.total_tables
            + self.total_columns
            + self.total_indexes
            + self.total_constraints
            + self.total_triggers;
        let processed = self.processed_tables
            + self.processed_columns
            + self.processed_indexes
            + self.processed_constraints
            + self.processed_triggers;
        Self::rate(processed, total)
    }

    pub fn summary(&self) -> String {
        format!(
            "enhanced comment processing: tables {}/{} ({:.1}%), columns {}/{} ({:.1}%), indexes {}/{} ({:.1}%), constraints {}/{} ({:.1}%), triggers {}/{} ({:.1}%), overall {:.1}%",
            self.processed_tables,
            self.total_tables,
            self.table_rate(),
            self.processed_columns,
            self.total_columns,
            self.column_rate(),
            self.processed_indexes,
            self.total_indexes,
            self.index_rate(),
            self.processed_constraints,
            self.total_constraints,
            self.constraint_rate(),
            self.processed_triggers,
            self.total_triggers,
            self.trigger_rate(),
            self.overall_rate(),
        )
    }
}

/// Applies enhanced comment processing on behalf of a database driver.
///
/// Strict mode aborts the walk on the first failure, annotated with the
/// failing object; lenient mode records the failure, attempts recovery, and
/// continues.
pub struct DriverAdapter {
    processor: CommentProcessor,
    config: ProcessingConfig,
    /// Empty means every kind is walked.
    enabled_types: Vec<ObjectType>,
    recovery: RecoveryManager,
    reporter: DiagnosticReporter,
}

impl DriverAdapter {
    pub fn new(config: ProcessingConfig) -> Self {
        Self::with_processor(CommentProcessor::with_config(config.clone()), config)
    }

    /// Pair an existing processor with walk behavior. The processor's own
    /// strictness may differ from the walk's.
    pub fn with_processor(processor: CommentProcessor, config: ProcessingConfig) -> Self {
        Self {
            processor,
            config,
            enabled_types: Vec::new(),
            recovery: RecoveryManager::new(),
            reporter: DiagnosticReporter::new(),
        }
    }

    /// Build the whole chain from an external configuration source,
    /// including the per-kind object filter.
    pub fn from_configurator(source: &impl CommentConfigurator) -> Self {
        let processor = CommentProcessor::from_configurator(source);
        let config = processor.config().clone();
        let enabled_types = WALKED_OBJECT_TYPES
            .iter()
            .copied()
            .filter(|kind| source.object_type_enabled(kind.as_str()))
            .collect();

        Self {
            processor,
            config,
            enabled_types,
            recovery: RecoveryManager::new(),
            reporter: DiagnosticReporter::new(),
        }
    }

    pub fn processor(&self) -> &CommentProcessor {
        &self.processor
    }

    pub fn reporter(&self) -> &DiagnosticReporter {
        &self.reporter
    }

    pub fn add_recovery_strategy(&mut self, strategy: Box<dyn RecoveryStrategy>) {
        self.recovery.add_strategy(strategy);
    }

    fn kind_enabled(&self, kind: ObjectType) -> bool {
        self.enabled_types.is_empty() || self.enabled_types.contains(&kind)
    }

    /// Walk the schema in declared order: tables, then per table columns,
    /// indexes, constraints and triggers. Returns the statistics with any
    /// captured error messages.
    pub fn process_schema(&mut self, schema: &mut Schema) -> Result<ProcessingStatistics> {
        let delimiter = self.config.default_delimiter.clone();
        let mut errors = Vec::new();

        for table in &mut schema.tables {
            let table_name = table.name.clone();

            if self.kind_enabled(table.object_type())
                && let Err(err) = table.process_enhanced_comment(&self.processor, &delimiter)
            {
                self.handle_failure(table, "table", &table_name, err, &mut errors)?;
            }

            if self.kind_enabled(ObjectType::Column) {
                for column in &mut table.columns {
                    let label = format!("{table_name}.{}", column.name);
                    if let Err(err) = column.process_enhanced_comment(&self.processor, &delimiter)
                    {
                        self.handle_failure(column, "column", &label, err, &mut errors)?;
                    }
                }
            }

            if self.kind_enabled(ObjectType::Index) {
                for index in &mut table.indexes {
                    let label = index.object_name().to_string();
                    if let Err(err) = index.process_enhanced_comment(&self.processor, &delimiter) {
                        self.handle_failure(index, "index", &label, err, &mut errors)?;
                    }
                }
            }

            if self.kind_enabled(ObjectType::Constraint) {
                for constraint in &mut table.constraints {
                    let label = constraint.object_name().to_string();
                    if let Err(err) =
                        constraint.process_enhanced_comment(&self.processor, &delimiter)
                    {
                        self.handle_failure(constraint, "constraint", &label, err, &mut errors)?;
                    }
                }
            }

            if self.kind_enabled(ObjectType::Trigger) {
                for trigger in &mut table.triggers {
                    let label = trigger.object_name().to_string();
                    if let Err(err) = trigger.process_enhanced_comment(&self.processor, &delimiter)
                    {
                        self.handle_failure(trigger, "trigger", &label, err, &mut errors)?;
                    }
                }
            }
        }

        let mut stats = self.statistics(schema);
        stats.processing_errors = errors;
        debug!(summary = %stats.summary(), "schema comment processing finished");
        Ok(stats)
    }

    /// Strict mode converts the failure into an annotated error; lenient
    /// mode tries the recovery chain and keeps walking.
    fn handle_failure<T: Commentable>(
        &mut self,
        object: &mut T,
        kind_label: &str,
        display_name: &str,
        err: ProcessorError,
        errors: &mut Vec<String>,
    ) -> Result<()> {
        if self.config.strict_mode {
            return Err(anyhow::Error::new(err)
                .context(format!("{kind_label} {display_name}: comment processing failed")));
        }

        let raw = object.raw_comment().unwrap_or("").to_string();
        let diagnostic = Diagnostic::from_processor_error(err, object.object_type(), display_name);
        warn!(diagnostic = %diagnostic, "comment processing failed, continuing");

        match self
            .recovery
            .try_recover(&diagnostic, &RecoveryContext::RawComment(&raw))
        {
            Ok(record) if !record.is_empty() => {
                object.set_enhanced_comment(Some(record));
                self.reporter.report_recovery(&diagnostic);
            }
            _ => {
                errors.push(diagnostic.to_string());
                self.reporter.report(diagnostic);
            }
        }

        Ok(())
    }

    /// Count totals and processed objects per kind over the whole tree.
    pub fn statistics(&self, schema: &Schema) -> ProcessingStatistics {
        let mut stats = ProcessingStatistics {
            total_tables: schema.tables.len(),
            ..ProcessingStatistics::default()
        };

        for table in &schema.tables {
            if table.has_enhanced_comment() {
                stats.processed_tables += 1;
            }

            stats.total_columns += table.columns.len();
            stats.processed_columns += table
                .columns
                .iter()
                .filter(|c| c.has_enhanced_comment())
                .count();

            stats.total_indexes += table.indexes.len();
            stats.processed_indexes += table
                .indexes
                .iter()
                .filter(|i| i.has_enhanced_comment())
                .count();

            stats.total_constraints += table.constraints.len();
            stats.processed_constraints += table
                .constraints
                .iter()
                .filter(|c| c.has_enhanced_comment())
                .count();

            stats.total_triggers += table.triggers.len();
            stats.processed_triggers += table
                .triggers
                .iter()
                .filter(|t| t.has_enhanced_comment())
                .count();
        }

        stats
    }
}

/// Known driver limitations worth surfacing before rendering.
pub fn driver_compatibility_warnings(driver_name: &str, schema: &Schema) -> Vec<String> {
    let mut warnings = Vec::new();

    match driver_name {
        "sqlite" => {
            for table in &schema.tables {
                if table.comment.as_deref().is_some_and(|c| !c.is_empty()) {
                    warnings.push(format!(
                        "sqlite does not support table comments: table {}",
                        table.name
                    ));
                }
            }
        }
        "mysql" => {
            for table in &schema.tables {
                for column in &table.columns {
                    let length = column
                        .comment
                        .as_deref()
                        .map(|c| c.chars().count())
                        .unwrap_or(0);
                    if length > 1024 {
                        warnings.push(format!(
                            "mysql comment length limit exceeded: table {}, column {}",
                            table.name, column.name
                        ));
                    }
                }
            }
        }
        "postgres" => {}
        other => warnings.push(format!("unknown driver: {other}")),
    }

    warnings
}

/// Declared for future bidirectional conversion between comment formats.
/// The semantics are still unsettled, so every call errors.
pub fn convert_comment_format(_comment: &str, from: &str, to: &str) -> Result<String> {
    anyhow::bail!("comment format conversion from {from} to {to} is not implemented")
}
