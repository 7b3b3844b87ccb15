//! Shared enhanced-comment behavior for commentable schema objects.

use std::collections::BTreeMap;

use crate::comment::error::ProcessorError;
use crate::comment::legacy;
use crate::comment::processor::CommentProcessor;
use crate::comment::record::{CommentRecord, ObjectType};

/// A schema object carrying a raw comment and an optional enhanced record.
///
/// The provided methods implement the processing hook and the accessors that
/// fall back to the raw comment when no structured data is attached.
pub trait Commentable {
    fn object_type(&self) -> ObjectType;

    fn object_name(&self) -> &str;

    fn raw_comment(&self) -> Option<&str>;

    fn set_raw_comment(&mut self, comment: Option<String>);

    fn enhanced_comment(&self) -> Option<&CommentRecord>;

    fn set_enhanced_comment(&mut self, record: Option<CommentRecord>);

    /// Tables and columns store the extracted logical name; other kinds
    /// ignore it.
    fn publish_logical_name(&mut self, _logical_name: &str) {}

    /// Run the processor over the raw comment and attach the result.
    ///
    /// When legacy-form splitting of the raw comment produced the record's
    /// logical name, the physical comment is rewritten to the description
    /// portion only. Existing renderers that read the plain comment keep
    /// seeing a display-ready string.
    fn process_enhanced_comment(
        &mut self,
        processor: &CommentProcessor,
        delimiter: &str,
    ) -> Result<(), ProcessorError> {
        let raw = match self.raw_comment() {
            Some(comment) if !comment.is_empty() => comment.to_string(),
            _ => {
                self.set_enhanced_comment(None);
                return Ok(());
            }
        };

        let record = processor.process_with_validation(&raw, delimiter, self.object_type())?;

        if record.has_logical_name() {
            let (head, tail) = legacy::split_comment(&raw, delimiter);
            if let Some(tail) = tail
                && head == record.logical_name
            {
                self.set_raw_comment((!tail.is_empty()).then_some(tail));
            }
            let logical_name = record.logical_name.clone();
            self.publish_logical_name(&logical_name);
        }

        self.set_enhanced_comment(Some(record));
        Ok(())
    }

    /// True iff a record is attached and it is non-empty.
    fn has_enhanced_comment(&self) -> bool {
        self.enhanced_comment().is_some_and(|r| !r.is_empty())
    }

    /// The enhanced record's description when a record is attached, even if
    /// that description is empty; the raw comment only when no record is
    /// present.
    fn description(&self) -> &str {
        self.enhanced_comment()
            .map(|r| r.description.as_str())
            .unwrap_or_else(|| self.raw_comment().unwrap_or(""))
    }

    fn tags(&self) -> &[String] {
        self.enhanced_comment()
            .map(|r| r.tags.as_slice())
            .unwrap_or(&[])
    }

    fn metadata(&self) -> Option<&BTreeMap<String, String>> {
        self.enhanced_comment().map(|r| &r.metadata)
    }

    fn priority(&self) -> i64 {
        self.enhanced_comment().map(|r| r.priority).unwrap_or(0)
    }

    fn is_deprecated(&self) -> bool {
        self.enhanced_comment()
            .map(|r| r.deprecated)
            .unwrap_or(false)
    }
}
