//! Unified record type produced by every comment parser.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Database object kinds that can carry a structured comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Table,
    Column,
    Index,
    View,
    Constraint,
    Trigger,
    Function,
    Enum,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Table => "table",
            ObjectType::Column => "column",
            ObjectType::Index => "index",
            ObjectType::View => "view",
            ObjectType::Constraint => "constraint",
            ObjectType::Trigger => "trigger",
            ObjectType::Function => "function",
            ObjectType::Enum => "enum",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown object type: {0}")]
pub struct UnknownObjectType(pub String);

impl FromStr for ObjectType {
    type Err = UnknownObjectType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(ObjectType::Table),
            "column" => Ok(ObjectType::Column),
            "index" => Ok(ObjectType::Index),
            "view" => Ok(ObjectType::View),
            "constraint" => Ok(ObjectType::Constraint),
            "trigger" => Ok(ObjectType::Trigger),
            "function" => Ok(ObjectType::Function),
            "enum" => Ok(ObjectType::Enum),
            other => Err(UnknownObjectType(other.to_string())),
        }
    }
}

/// Normalized representation of a parsed comment.
///
/// A record is constructed by a parser, optionally replaced by the validator,
/// and finally attached to its schema object. It is never mutated thereafter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Display name, distinct from the physical identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub logical_name: String,
    /// Long-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Classification tags, order-preserving.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Structured keys not otherwise claimed, plus `object_type`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    /// Lower is higher priority; 0 means absent.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: i64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// Original raw comment, preserved verbatim. Not exported.
    #[serde(skip)]
    pub source: String,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl CommentRecord {
    /// Record carrying only the original comment text.
    pub fn from_source(source: &str) -> Self {
        Self {
            source: source.to_string(),
            ..Self::default()
        }
    }

    /// True when no structured metadata is present. The empty record is a
    /// legal output meaning "nothing to document beyond the raw comment".
    pub fn is_empty(&self) -> bool {
        self.logical_name.is_empty()
            && self.description.is_empty()
            && self.tags.is_empty()
            && self.metadata.is_empty()
    }

    pub fn has_logical_name(&self) -> bool {
        !self.logical_name.is_empty()
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    /// Logical name, or the given fallback when unset.
    pub fn logical_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.logical_name.is_empty() {
            fallback
        } else {
            &self.logical_name
        }
    }

    /// Description, or the given fallback when unset.
    pub fn description_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.description.is_empty() {
            fallback
        } else {
            &self.description
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Right-biased fallback merge: `self` wins for non-empty scalars, tags
    /// become the order-preserving union, metadata is filled only where the
    /// key is absent in `self`. Priority is taken from `other` when unset.
    pub fn merge(&self, other: &CommentRecord) -> CommentRecord {
        let mut merged = self.clone();

        if merged.logical_name.is_empty() && !other.logical_name.is_empty() {
            merged.logical_name = other.logical_name.clone();
        }
        if merged.description.is_empty() && !other.description.is_empty() {
            merged.description = other.description.clone();
        }
        if merged.priority == 0 {
            merged.priority = other.priority;
        }

        merged.tags = merged
            .tags
            .iter()
            .chain(other.tags.iter())
            .cloned()
            .unique()
            .collect();

        for (key, value) in &other.metadata {
            merged
                .metadata
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }

        merged
    }
}
