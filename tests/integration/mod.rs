pub mod config_processor;
pub mod recovery_reporting;
pub mod schema_walk;
