//! Schema tree consumed from database drivers and walked by the adapter.

use serde::{Deserialize, Serialize};

pub mod adapter;
pub mod comments;
pub mod constraint;
pub mod index;
pub mod table;
pub mod triggers;

pub use adapter::{DriverAdapter, ProcessingStatistics};
pub use comments::Commentable;
pub use constraint::Constraint;
pub use index::Index;
pub use table::{Column, Table};
pub use triggers::Trigger;

/// Identity of the driver that produced a schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_version: Option<String>,
}

/// A walked database schema: tables in declared order, each with its
/// columns, indexes, constraints and triggers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<DriverInfo>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn find_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }
}
