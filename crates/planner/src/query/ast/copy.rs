//! Defines the AST for Redshift COPY statements.

use crate::query::ast::common::{Credentials, DataOption, TableRef};

/// Imports every object under `source` into `table`.
#[derive(Debug, Clone)]
pub struct Copy {
    pub table: TableRef,
    /// Full `s3://` URL of the staging prefix.
    pub source: String,
    pub credentials: Credentials,
    pub options: Vec<DataOption>,
}
