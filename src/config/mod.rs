pub mod builder;
pub mod defaults;
pub mod merge;
pub mod types;


pub use builder::ConfigBuilder;
pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load raw configuration input from a YAML file. A missing file yields the
/// empty input so every field falls back to its default.
pub fn load_config(config_file: &str) -> Result<ConfigInput> {
    if !Path::new(config_file).exists() {
        return Ok(ConfigInput::default());
    }

    let contents = std::fs::read_to_string(config_file)
        .with_context(|| format!("failed to read config file {config_file}"))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {config_file}"))
}
