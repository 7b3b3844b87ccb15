pub mod e2e;
pub mod registry_fallback;
pub mod validation_levels;
