//! Object-store addressing for staged table data.

use model::execution::params::TaskParams;
use std::fmt;

const S3_SCHEME: &str = "s3://";

/// Computes the key prefix a table is unloaded to and loaded from.
pub struct StagingPathBuilder;

impl StagingPathBuilder {
    /// `bucket/schema/table_`.
    ///
    /// The warehouse may split one unload into several objects, all sharing
    /// this prefix, so readers must match on the prefix rather than on a
    /// single key.
    pub fn build(bucket: &str, schema: &str, table: &str) -> String {
        format!("{bucket}/{schema}/{table}_")
    }
}

/// Staging prefix of one table, derived from its task parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLocation {
    prefix: String,
}

impl StagingLocation {
    pub fn new(bucket: &str, schema: &str, table: &str) -> Self {
        Self {
            prefix: StagingPathBuilder::build(bucket, schema, table),
        }
    }

    pub fn for_params(params: &TaskParams) -> Self {
        Self::new(
            &params.staging().bucket,
            params.schema_name(),
            params.table_name(),
        )
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn url(&self) -> String {
        format!("{S3_SCHEME}{}", self.prefix())
    }
}

impl fmt::Display for StagingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}
