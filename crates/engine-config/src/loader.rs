use crate::{
    env::EnvManager, error::ConfigError, raw::RawConfig,
    validation::config_validator::ConfigValidator,
};
use model::execution::config::MigrationConfig;
use std::path::Path;
use tracing::info;

/// Reads the TOML file at `path`, applies environment overrides and
/// validates the result.
pub fn load<P: AsRef<Path>>(path: P, env: &EnvManager) -> Result<MigrationConfig, ConfigError> {
    let path = path.as_ref();
    info!("Loading configuration from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    from_toml_str(&content, env)
}

pub fn from_toml_str(content: &str, env: &EnvManager) -> Result<MigrationConfig, ConfigError> {
    let mut raw = RawConfig::from_toml(content)?;
    raw.apply_overrides(env)?;
    ConfigValidator::new(raw).validate()
}
