//! Defines the `Dialect` trait for warehouse-specific SQL syntax.

use model::core::identifiers::TableRef;

pub trait Dialect: Send + Sync {
    /// Renders a schema-qualified table name.
    fn table_name(&self, table: &TableRef) -> String;

    /// Wraps a value in string-literal quotes.
    fn string_literal(&self, value: &str) -> String;
}

/// Amazon Redshift.
///
/// Identifiers and literals are substituted verbatim: no identifier quoting
/// and no escaping of embedded quote characters.
#[derive(Debug, Clone)]
pub struct Redshift;

impl Dialect for Redshift {
    fn table_name(&self, table: &TableRef) -> String {
        table.qualified()
    }

    fn string_literal(&self, value: &str) -> String {
        format!("'{value}'")
    }
}
