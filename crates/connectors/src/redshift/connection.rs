use crate::{
    error::WarehouseError,
    redshift::utils::{Session, open_session},
    warehouse::{WarehouseConnection, WarehouseConnector},
};
use async_trait::async_trait;
use model::execution::connection::WarehouseEndpoint;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_postgres::Client;
use tracing::debug;

/// Opens plain (unpooled) Redshift sessions.
#[derive(Debug, Clone, Default)]
pub struct RedshiftConnector;

#[async_trait]
impl WarehouseConnector for RedshiftConnector {
    async fn connect(
        &self,
        endpoint: &WarehouseEndpoint,
        database: &str,
    ) -> Result<Box<dyn WarehouseConnection>, WarehouseError> {
        let session = open_session(endpoint, database).await?;
        Ok(Box::new(RedshiftConnection::new(session)))
    }
}

/// A Redshift session with DB-API style transactions: the first statement
/// opens a transaction that stays open until `commit`, and `close` rolls
/// back whatever was not committed.
pub struct RedshiftConnection {
    client: Option<Client>,
    driver: JoinHandle<()>,
    notices: mpsc::UnboundedReceiver<String>,
    in_transaction: bool,
}

impl RedshiftConnection {
    fn new(session: Session) -> Self {
        Self {
            client: Some(session.client),
            driver: session.driver,
            notices: session.notices,
            in_transaction: false,
        }
    }
}

#[async_trait]
impl WarehouseConnection for RedshiftConnection {
    async fn execute(&mut self, sql: &str) -> Result<(), WarehouseError> {
        let client = self.client.as_ref().ok_or(WarehouseError::Closed)?;
        if !self.in_transaction {
            client.batch_execute("BEGIN").await?;
            self.in_transaction = true;
        }
        client.batch_execute(sql).await?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), WarehouseError> {
        let client = self.client.as_ref().ok_or(WarehouseError::Closed)?;
        if self.in_transaction {
            client.batch_execute("COMMIT").await?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn notices(&mut self) -> Vec<String> {
        let mut drained = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            drained.push(notice);
        }
        drained
    }

    async fn close(&mut self) -> Result<(), WarehouseError> {
        let Some(client) = self.client.take() else {
            return Ok(());
        };

        if self.in_transaction {
            self.in_transaction = false;
            if let Err(err) = client.batch_execute("ROLLBACK").await {
                debug!(%err, "Rollback on close failed");
            }
        }

        // dropping the client ends the driver task
        drop(client);
        if let Err(err) = (&mut self.driver).await {
            debug!(%err, "Connection driver ended abnormally");
        }
        Ok(())
    }
}
