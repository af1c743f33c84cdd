use crate::{
    error::WarehouseError, redshift::utils::open_session, warehouse::TableLister,
};
use async_trait::async_trait;
use model::execution::connection::WarehouseEndpoint;
use tracing::{debug, info};

const QUERY_LIST_TABLES_SQL: &str = include_str!("sql/list_tables.sql");

/// Reads the base tables of a schema from `information_schema`.
#[derive(Debug, Clone)]
pub struct RedshiftTableLister {
    endpoint: WarehouseEndpoint,
    database: String,
}

impl RedshiftTableLister {
    pub fn new(endpoint: WarehouseEndpoint, database: impl Into<String>) -> Self {
        Self {
            endpoint,
            database: database.into(),
        }
    }
}

#[async_trait]
impl TableLister for RedshiftTableLister {
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, WarehouseError> {
        info!("Listing all tables in schema: {schema}");

        let session = open_session(&self.endpoint, &self.database).await?;
        let rows = session.client.query(QUERY_LIST_TABLES_SQL, &[&schema]).await?;

        let tables = rows
            .iter()
            .map(|row| row.try_get::<_, String>(0))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = tables.len(), "Catalog returned tables");
        Ok(tables)
    }
}
