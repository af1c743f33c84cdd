use crate::{core::secret::Secret, execution::connection::WarehouseEndpoint};

/// Object-store location and credentials used to stage table data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingConfig {
    pub bucket: String,
    pub access_key: String,
    pub secret_key: Secret,
}

/// Run-wide migration settings.
///
/// Built once at startup and shared read-only (behind an `Arc`) by every
/// task of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    pub staging: StagingConfig,
    pub source: WarehouseEndpoint,
    pub destination: WarehouseEndpoint,
    /// Database name, identical on both clusters.
    pub database: String,
    pub schema: String,
    pub truncate_before_load: bool,
}

impl MigrationConfig {
    /// Same settings, pointed at a different schema.
    pub fn with_schema(&self, schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            ..self.clone()
        }
    }
}
