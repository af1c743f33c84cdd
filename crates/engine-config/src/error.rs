use thiserror::Error;

/// Errors raised while reading or validating the migration configuration.
///
/// All of them are fatal: no connection is opened until the configuration
/// is known to be complete.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read the configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("Failed to parse the configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The env file could not be read or contains a malformed line.
    #[error("Invalid env file: {0}")]
    EnvFile(String),

    /// One or more fields are missing or invalid.
    #[error("Invalid configuration: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),
}
