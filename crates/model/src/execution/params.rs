use crate::{
    core::identifiers::TableRef,
    execution::{
        config::{MigrationConfig, StagingConfig},
        connection::WarehouseEndpoint,
    },
};

/// Everything one table migration needs, bound once when the task is created.
///
/// The run configuration is cloned into each value so tasks never share
/// mutable state; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskParams {
    config: MigrationConfig,
    table: TableRef,
}

impl TaskParams {
    pub fn new(config: &MigrationConfig, schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            config: config.clone(),
            table: TableRef::new(schema, table),
        }
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn schema_name(&self) -> &str {
        &self.table.schema
    }

    pub fn table_name(&self) -> &str {
        &self.table.name
    }

    pub fn staging(&self) -> &StagingConfig {
        &self.config.staging
    }

    pub fn source(&self) -> &WarehouseEndpoint {
        &self.config.source
    }

    pub fn destination(&self) -> &WarehouseEndpoint {
        &self.config.destination
    }

    pub fn database(&self) -> &str {
        &self.config.database
    }

    pub fn truncate_before_load(&self) -> bool {
        self.config.truncate_before_load
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::secret::Secret;

    fn config() -> MigrationConfig {
        MigrationConfig {
            staging: StagingConfig {
                bucket: "b".into(),
                access_key: "ak".into(),
                secret_key: Secret::new("sk"),
            },
            source: WarehouseEndpoint::new("src", "u", "p"),
            destination: WarehouseEndpoint::new("dst", "u", "p"),
            database: "db".into(),
            schema: "s".into(),
            truncate_before_load: false,
        }
    }

    #[test]
    fn test_params_bind_table_without_touching_config() {
        let base = config();
        let orders = TaskParams::new(&base, "s", "orders");
        let customers = TaskParams::new(&base, "s", "customers");

        assert_eq!(orders.table_name(), "orders");
        assert_eq!(customers.table_name(), "customers");
        assert_eq!(orders.schema_name(), "s");
        assert_eq!(orders.source().host, "src");
        assert_eq!(base, config());
    }
}
