//! On-disk shape of the configuration file.
//!
//! ```toml
//! [aws]
//! s3_bucket = "staging-bucket"
//! access_key = "AKIA..."
//! secret_key = "..."
//!
//! [redshift]
//! source_host = "old-cluster.example.com"
//! source_user = "etl"
//! source_password = "..."
//! dest_host = "new-cluster.example.com"
//! dest_user = "etl"
//! dest_password = "..."
//! dbname = "analytics"
//! schema = "sales"
//!
//! [migration]
//! truncate_before_load = false
//! ```

use crate::{env::EnvManager, error::ConfigError};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    pub aws: AwsSection,
    #[serde(default)]
    pub redshift: RedshiftSection,
    #[serde(default)]
    pub migration: MigrationSection,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwsSection {
    pub s3_bucket: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedshiftSection {
    pub source_host: Option<String>,
    pub source_port: Option<u16>,
    pub source_user: Option<String>,
    pub source_password: Option<String>,
    pub dest_host: Option<String>,
    pub dest_port: Option<u16>,
    pub dest_user: Option<String>,
    pub dest_password: Option<String>,
    pub dbname: Option<String>,
    pub schema: Option<String>,
    pub ssl_mode: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationSection {
    pub truncate_before_load: Option<bool>,
}

impl RawConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Replaces fields with their `REDSHIFT_MIGRATE_*` environment overrides.
    pub fn apply_overrides(&mut self, env: &EnvManager) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        for (field, slot) in self.string_fields() {
            if let Some(value) = env.override_for(field) {
                log_override(env, field, value);
                *slot = Some(value.to_string());
            }
        }

        for (field, slot) in [
            ("source_port", &mut self.redshift.source_port),
            ("dest_port", &mut self.redshift.dest_port),
        ] {
            if let Some(value) = env.override_for(field) {
                log_override(env, field, value);
                match value.parse::<u16>() {
                    Ok(port) => *slot = Some(port),
                    Err(_) => errors.push(format!(
                        "{} must be a port number, got '{value}'",
                        EnvManager::override_key(field)
                    )),
                }
            }
        }

        if let Some(value) = env.override_for("truncate_before_load") {
            log_override(env, "truncate_before_load", value);
            match value.to_lowercase().as_str() {
                "true" | "yes" | "1" => self.migration.truncate_before_load = Some(true),
                "false" | "no" | "0" => self.migration.truncate_before_load = Some(false),
                _ => errors.push(format!(
                    "{} must be a boolean, got '{value}'",
                    EnvManager::override_key("truncate_before_load")
                )),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationFailed(errors))
        }
    }

    fn string_fields(&mut self) -> [(&'static str, &mut Option<String>); 12] {
        let aws = &mut self.aws;
        let rs = &mut self.redshift;
        [
            ("s3_bucket", &mut aws.s3_bucket),
            ("access_key", &mut aws.access_key),
            ("secret_key", &mut aws.secret_key),
            ("source_host", &mut rs.source_host),
            ("source_user", &mut rs.source_user),
            ("source_password", &mut rs.source_password),
            ("dest_host", &mut rs.dest_host),
            ("dest_user", &mut rs.dest_user),
            ("dest_password", &mut rs.dest_password),
            ("dbname", &mut rs.dbname),
            ("schema", &mut rs.schema),
            ("ssl_mode", &mut rs.ssl_mode),
        ]
    }
}

fn log_override(env: &EnvManager, field: &str, value: &str) {
    let shown = if env.is_sensitive(field) { "***" } else { value };
    info!("Config override from {}: {shown}", EnvManager::override_key(field));
}
