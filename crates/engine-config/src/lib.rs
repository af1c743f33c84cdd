//! Loading and validating the migration configuration.

pub mod env;
pub mod error;
pub mod loader;
pub mod raw;
pub mod validation;
