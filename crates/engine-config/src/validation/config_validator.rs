use crate::{error::ConfigError, raw::RawConfig};
use model::{
    core::secret::Secret,
    execution::{
        config::{MigrationConfig, StagingConfig},
        connection::{DEFAULT_PORT, SslMode, WarehouseEndpoint},
    },
};
use tracing::{info, warn};

/// Turns a raw configuration into a [`MigrationConfig`], reporting every
/// missing or invalid field at once.
pub struct ConfigValidator {
    raw: RawConfig,
    errors: Vec<String>,
}

impl ConfigValidator {
    pub fn new(raw: RawConfig) -> Self {
        Self {
            raw,
            errors: Vec::new(),
        }
    }

    pub fn validate(mut self) -> Result<MigrationConfig, ConfigError> {
        let aws = self.raw.aws.clone();
        let rs = self.raw.redshift.clone();

        let bucket = self.required("aws.s3_bucket", aws.s3_bucket);
        let access_key = self.required("aws.access_key", aws.access_key);
        let secret_key = self.required("aws.secret_key", aws.secret_key);

        let source_host = self.required("redshift.source_host", rs.source_host);
        let source_user = self.required("redshift.source_user", rs.source_user);
        let source_password = self.required("redshift.source_password", rs.source_password);
        let source_port = self.port("redshift.source_port", rs.source_port);

        let dest_host = self.required("redshift.dest_host", rs.dest_host);
        let dest_user = self.required("redshift.dest_user", rs.dest_user);
        let dest_password = self.required("redshift.dest_password", rs.dest_password);
        let dest_port = self.port("redshift.dest_port", rs.dest_port);

        let database = self.required("redshift.dbname", rs.dbname);
        let schema = self.required("redshift.schema", rs.schema);
        let ssl_mode = self.ssl_mode(rs.ssl_mode);

        if !self.errors.is_empty() {
            return Err(ConfigError::ValidationFailed(self.errors));
        }

        let config = MigrationConfig {
            staging: StagingConfig {
                bucket,
                access_key,
                secret_key: Secret::new(secret_key),
            },
            source: WarehouseEndpoint {
                host: source_host,
                port: source_port,
                user: source_user,
                password: Secret::new(source_password),
                ssl_mode,
            },
            destination: WarehouseEndpoint {
                host: dest_host,
                port: dest_port,
                user: dest_user,
                password: Secret::new(dest_password),
                ssl_mode,
            },
            database,
            schema,
            truncate_before_load: self.raw.migration.truncate_before_load.unwrap_or(false),
        };

        warn_on_quotes(&config);
        info!(
            "Configuration loaded: {} -> {} (database {}, schema {})",
            config.source, config.destination, config.database, config.schema
        );

        Ok(config)
    }

    fn required(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            Some(_) => {
                self.errors.push(format!("{field} must not be empty"));
                String::new()
            }
            None => {
                self.errors.push(format!("{field} is required"));
                String::new()
            }
        }
    }

    fn port(&mut self, field: &str, value: Option<u16>) -> u16 {
        match value {
            Some(0) => {
                self.errors.push(format!("{field} must not be 0"));
                DEFAULT_PORT
            }
            Some(port) => port,
            None => DEFAULT_PORT,
        }
    }

    fn ssl_mode(&mut self, value: Option<String>) -> SslMode {
        match value.map(|v| v.parse::<SslMode>()) {
            Some(Ok(mode)) => mode,
            Some(Err(err)) => {
                self.errors.push(format!("redshift.ssl_mode: {err}"));
                SslMode::default()
            }
            None => SslMode::default(),
        }
    }
}

/// Values are substituted into warehouse commands without escaping, so a
/// quote character will make the warehouse reject them.
fn warn_on_quotes(config: &MigrationConfig) {
    let substituted = [
        ("aws.s3_bucket", config.staging.bucket.as_str()),
        ("aws.access_key", config.staging.access_key.as_str()),
        ("aws.secret_key", config.staging.secret_key.expose()),
        ("redshift.schema", config.schema.as_str()),
    ];

    for (field, value) in substituted {
        if value.contains('\'') {
            warn!("{field} contains a quote character; generated commands will be malformed");
        }
    }
}
