use crate::query::ast::{
    common::{Credentials, DataOption, TableRef},
    copy::Copy,
};

#[derive(Debug, Clone)]
pub struct CopyBuilder {
    ast: Copy,
}

impl CopyBuilder {
    pub fn new(table: TableRef) -> Self {
        Self {
            ast: Copy {
                table,
                source: String::new(),
                credentials: Credentials {
                    access_key_id: String::new(),
                    secret_access_key: String::new(),
                },
                options: Vec::new(),
            },
        }
    }

    pub fn source(mut self, url: impl Into<String>) -> Self {
        self.ast.source = url.into();
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

    pub fn build(self) -> Copy {
        self.ast
    }
}
