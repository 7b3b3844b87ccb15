//! The narrow interface database drivers are consumed through.

use anyhow::Result;

use crate::catalog::adapter::{DriverAdapter, ProcessingStatistics};
use crate::catalog::{DriverInfo, Schema};

/// A database driver fills a schema tree from a live connection.
pub trait Driver {
    fn analyze(&self, schema: &mut Schema) -> Result<()>;

    fn info(&self) -> DriverInfo;
}

/// Drivers that accept logical-name extraction settings up front.
pub trait ConfigurableDriver: Driver {
    fn set_logical_name_config(&mut self, delimiter: &str, fallback_to_name: bool);
}

/// Run the driver analysis, then enhanced comment processing over the
/// resulting tree. The driver identity is recorded on the schema.
pub fn analyze_with_enhanced_comments(
    driver: &dyn Driver,
    schema: &mut Schema,
    adapter: &mut DriverAdapter,
) -> Result<ProcessingStatistics> {
    driver.analyze(schema)?;
    schema.driver = Some(driver.info());
    adapter.process_schema(schema)
}
