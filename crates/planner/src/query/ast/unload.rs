//! Defines the AST for Redshift UNLOAD statements.

use crate::query::ast::common::{Credentials, DataOption, TableRef};

/// Exports every row of `table` to objects under `target`.
#[derive(Debug, Clone)]
pub struct Unload {
    pub table: TableRef,
    /// Full `s3://` URL of the staging prefix.
    pub target: String,
    pub credentials: Credentials,
    pub options: Vec<DataOption>,
}
