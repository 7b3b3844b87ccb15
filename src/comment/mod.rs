pub mod error;
pub mod json;
pub mod legacy;
pub mod parser;
pub mod processor;
pub mod record;
pub mod recovery;
pub mod validator;
pub mod yaml;

pub use error::{
    Category, Diagnostic, DiagnosticBuilder, ParseError, ParseErrorKind, ProcessorError, Severity,
    ValidationError, ValidationErrorKind,
};
pub use json::JsonParser;
pub use legacy::LegacyParser;
pub use parser::{CommentParser, ParserRegistry};
pub use processor::{
    BatchStats, CommentConfigurator, CommentInput, CommentProcessor, ProcessingConfig,
};
pub use record::{CommentRecord, ObjectType};
pub use recovery::{DiagnosticReporter, RecoveryContext, RecoveryManager, RecoveryStrategy};
pub use validator::{CommentValidator, ValidationProfile};
pub use yaml::YamlParser;
