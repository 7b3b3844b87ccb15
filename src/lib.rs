//! Core comment-processing pipeline for database schema documentation.
//!
//! Database comments may carry structured metadata (a display name, a longer
//! description, tags, priority, deprecation, free-form key/value pairs) as
//! JSON, YAML, or the historical `name|description` delimiter form. This
//! crate parses those comments into a unified [`comment::CommentRecord`],
//! validates and sanitizes the result, and walks a [`catalog::Schema`] tree
//! attaching the records to every commentable object.

pub mod catalog;
pub mod comment;
pub mod config;
pub mod driver;

pub use catalog::Schema;
pub use comment::{CommentProcessor, CommentRecord, ObjectType, ProcessingConfig};
