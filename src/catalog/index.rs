use serde::{Deserialize, Serialize};

use super::comments::Commentable;
use crate::comment::record::{CommentRecord, ObjectType};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    /// Complete index definition as reported by the driver.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub def: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_comment: Option<CommentRecord>,
}

impl Index {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Commentable for Index {
    fn object_type(&self) -> ObjectType {
        ObjectType::Index
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
}
