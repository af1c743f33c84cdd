use crate::query::ast::{
    common::{Credentials, DataOption, TableRef},
    unload::Unload,
};

#[derive(Debug, Clone)]
pub struct UnloadBuilder {
    ast: Unload,
}

impl UnloadBuilder {
    pub fn new(table: TableRef) -> Self {
        Self {
            ast: Unload {
                table,
                target: String::new(),
                credentials: Credentials {
                    access_key_id: String::new(),
                    secret_access_key: String::new(),
                },
                options: Vec::new(),
            },
        }
    }

    pub fn target(mut self, url: impl Into<String>) -> Self {
        self.ast.target = url.into();
        self
    }

    pub fn credentials(mut self, access_key_id: &str, secret_access_key: &str) -> Self {
        self.ast.credentials = Credentials {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
        };
        self
    }

    pub fn option(mut self, key: &str, value: Option<&str>) -> Self {
        self.ast.options.push(DataOption {
            key: key.to_string(),
            value: value.map(|v| v.to_string()),
        });
        self
    }

    pub fn build(self) -> Unload {
        self.ast
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{ast::common::TableRef, builder::unload::UnloadBuilder};

    #[test]
    fn test_unload_builder_with_options() {
        let unload = UnloadBuilder::new(TableRef::new("sales", "orders"))
            .target("s3://bucket/sales/orders_")
            .credentials("ak", "sk")
            .option("ESCAPE", None)
            .option("MAXFILESIZE", Some("100 MB"))
            .build();

        assert_eq!(unload.table.name, "orders");
        assert_eq!(unload.target, "s3://bucket/sales/orders_");
        assert_eq!(unload.credentials.secret_access_key, "sk");
        assert_eq!(unload.options.len(), 2);
    }
}
