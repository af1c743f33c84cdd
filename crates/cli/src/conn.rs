use crate::error::CliError;
use async_trait::async_trait;
use connectors::redshift::probe;
use model::execution::{config::MigrationConfig, connection::WarehouseEndpoint};
use tracing::{error, info};

/// Trait for "pinging" a configured cluster
#[async_trait]
pub trait ConnectionPinger {
    /// Attempts to ping; returns Err if unreachable
    async fn ping(&self) -> Result<(), CliError>;
}

/// Redshift pinger for one side of the migration
pub struct RedshiftPinger<'a> {
    pub target: &'static str,
    pub endpoint: &'a WarehouseEndpoint,
    pub database: &'a str,
}

impl<'a> RedshiftPinger<'a> {
    pub fn source(config: &'a MigrationConfig) -> Self {
        Self {
            target: "source",
            endpoint: &config.source,
            database: &config.database,
        }
    }

    pub fn destination(config: &'a MigrationConfig) -> Self {
        Self {
            target: "destination",
            endpoint: &config.destination,
            database: &config.database,
        }
    }
}

#[async_trait]
impl ConnectionPinger for RedshiftPinger<'_> {
    async fn ping(&self) -> Result<(), CliError> {
        probe::ping(self.endpoint, self.database)
            .await
            .map_err(|cause| {
                error!("{} cluster at '{}' is unreachable: {cause}", self.target, self.endpoint);
                CliError::ConnectionTest {
                    target: self.target,
                    cause,
                }
            })?;

        info!("{} cluster at '{}' is reachable", self.target, self.endpoint);
        Ok(())
    }
}

/// Pings both clusters, even when the first one fails. Returns the first failure.
pub async fn ping_all(config: &MigrationConfig) -> Result<(), CliError> {
    let source = RedshiftPinger::source(config).ping().await;
    let destination = RedshiftPinger::destination(config).ping().await;
    source.and(destination)
}
