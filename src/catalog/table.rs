//! Tables and columns, the objects that also carry a logical name.

use serde::{Deserialize, Serialize};

use super::comments::Commentable;
use super::constraint::Constraint;
use super::index::Index;
use super::triggers::Trigger;
use crate::comment::record::{CommentRecord, ObjectType};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub data_type: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_comment: Option<CommentRecord>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Enhanced logical name, else the stored field, else the physical name
    /// when the fallback flag is set.
    pub fn logical_name_or_fallback(&self, fallback_to_name: bool) -> String {
        if let Some(record) = &self.enhanced_comment
            && record.has_logical_name()
        {
            return record.logical_name.clone();
        }
        if let Some(logical_name) = &self.logical_name
            && !logical_name.is_empty()
        {
            return logical_name.clone();
        }
        if fallback_to_name {
            self.name.clone()
        } else {
            String::new()
        }
    }
}

impl Commentable for Column {
    fn object_type(&self) -> ObjectType {
        ObjectType::Column
    }

    fn object_name(&self) -> &str {
        &self.name
    }

    fn raw_comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn set_raw_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    fn enhanced_comment(&self) -> Option<&CommentRecord> {
        self.enhanced_comment.as_ref()
    }

    fn set_enhanced_comment(&mut self, record: Option<CommentRecord>) {
        self.enhanced_comment = record;
    }

    fn publish_logical_name(&mut self, logical_name: &str) {
        self.logical_name = Some(logical_name.to_string());
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    /// `BASE TABLE` or `VIEW` as reported by the driver.
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub table_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<Index>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<Trigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_comment: Option<CommentRecord>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_type: "BASE TABLE".to_string(),
            ..Self::default()
        }
    }

    pub fn is_view(&self) -> bool {
        self.table_type.eq_ignore_ascii_case("view")
    }

    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Enhanced logical name, else the stored field, else the physical name
    /// when the fallback flag is set.
    pub fn logical_name_or_fallback(&self, fallback_to_name: bool) -> String {
        if let Some(record) = &self.enhanced_comment
            && record.has_logical_name()
        {
            return record.logical_name.clone();
        }
        if let Some(logical_name) = &self.logical_name
            && !logical_name.is_empty()
        {
            return logical_name.clone();
        }
        if fallback_to_name {
            self.name.clone()
        } else {
            String::new()
        }
    }
}

impl Commentable for Table {
    fn object_type(&self) -> ObjectType {
        if self.is_view() {
            ObjectType::View
        } else {
            ObjectType::Table
        }
    }

    fn object_name(&self) -> &str {
        &self.name
    }

    fn raw_comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn set_raw_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    fn enhanced_comment(&self) -> Option<&CommentRecord> {
        self.enhanced_comment.as_ref()
    }

    fn set_enhanced_comment(&mut self, record: Option<CommentRecord>) {
        self.enhanced_comment = record;
    }

    fn publish_logical_name(&mut self, logical_name: &str) {
        self.logical_name = Some(logical_name.to_string());
    }
}
