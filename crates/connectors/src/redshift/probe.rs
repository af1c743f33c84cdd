use crate::{error::WarehouseError, redshift::utils::open_session};
use model::execution::connection::WarehouseEndpoint;
use tracing::{error, info};

/// Connects and runs `SELECT 1`, failing if the cluster is unreachable or
/// answers with anything else.
pub async fn ping(endpoint: &WarehouseEndpoint, database: &str) -> Result<(), WarehouseError> {
    info!("Pinging Redshift at '{endpoint}'");

    let session = open_session(endpoint, database).await?;
    let row = session.client.query_one("SELECT 1", &[]).await.map_err(|e| {
        error!("Redshift ping query on '{endpoint}' failed: {e}");
        WarehouseError::from(e)
    })?;

    let val: i32 = row.try_get(0)?;
    if val != 1 {
        let msg = format!("Ping to '{endpoint}' returned unexpected result: {val}");
        error!("{}", msg);
        return Err(WarehouseError::rejected(msg));
    }

    info!("Redshift ping to '{endpoint}' succeeded");
    Ok(())
}
