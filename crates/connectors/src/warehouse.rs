//! The warehouse capabilities the migration engine consumes.

use crate::error::WarehouseError;
use async_trait::async_trait;
use model::execution::connection::WarehouseEndpoint;

/// Opens connections to a warehouse cluster.
#[async_trait]
pub trait WarehouseConnector: Send + Sync {
    async fn connect(
        &self,
        endpoint: &WarehouseEndpoint,
        database: &str,
    ) -> Result<Box<dyn WarehouseConnection>, WarehouseError>;
}

/// One open session. Owned by a single task and never shared or pooled.
#[async_trait]
pub trait WarehouseConnection: Send {
    /// Submits `sql`. Returns once the warehouse has accepted the command.
    async fn execute(&mut self, sql: &str) -> Result<(), WarehouseError>;

    /// Commits everything submitted since the last commit.
    async fn commit(&mut self) -> Result<(), WarehouseError>;

    /// Drains the informational notices received so far.
    fn notices(&mut self) -> Vec<String>;

    /// Ends the session, discarding uncommitted work. Safe to call twice.
    async fn close(&mut self) -> Result<(), WarehouseError>;
}

/// Lists the base tables of a schema.
#[async_trait]
pub trait TableLister: Send + Sync {
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, WarehouseError>;
}
