//! Renders the warehouse commands a table migration submits.

use crate::{
    query::{
        ast::truncate::Truncate,
        builder::{copy::CopyBuilder, unload::UnloadBuilder},
        dialect::{Dialect, Redshift},
        renderer::{Render, Renderer},
    },
    staging::StagingLocation,
};
use model::execution::params::TaskParams;
use std::fmt;

/// Options every unload carries. `ESCAPE` backslash-escapes delimiters and
/// newlines inside field values so the data survives without quoting.
const UNLOAD_OPTIONS: &[&str] = &["ESCAPE"];

/// Options every load carries. `EXPLICIT_IDS` keeps the identity values
/// assigned by the source instead of generating new ones.
const LOAD_OPTIONS: &[&str] = &["ESCAPE", "EXPLICIT_IDS"];

/// A rendered statement together with a credential-free rendition.
///
/// `Display` and `Debug` only ever show the redacted text.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedCommand {
    sql: String,
    redacted: String,
}

impl RenderedCommand {
    fn of(node: &dyn Render, dialect: &dyn Dialect) -> Self {
        let mut renderer = Renderer::new(dialect);
        node.render(&mut renderer);

        let mut redacting = Renderer::redacting(dialect);
        node.render(&mut redacting);

        Self {
            sql: renderer.finish(),
            redacted: redacting.finish(),
        }
    }

    /// The text to submit to the warehouse.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn redacted(&self) -> &str {
        &self.redacted
    }
}

impl fmt::Display for RenderedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted)
    }
}

impl fmt::Debug for RenderedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RenderedCommand").field(&self.redacted).finish()
    }
}

/// Builds UNLOAD, COPY and TRUNCATE statements for one task.
///
/// Configuration values are substituted as-is. A value containing a single
/// quote yields a malformed statement that the warehouse will reject.
pub struct CommandBuilder<'a> {
    params: &'a TaskParams,
    dialect: &'a dyn Dialect,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(params: &'a TaskParams) -> Self {
        Self {
            params,
            dialect: &Redshift,
        }
    }

    pub fn staging(&self) -> StagingLocation {
        StagingLocation::for_params(self.params)
    }

    pub fn unload(&self) -> RenderedCommand {
        let staging = self.params.staging();
        let builder = UNLOAD_OPTIONS.iter().fold(
            UnloadBuilder::new(self.params.table().clone())
                .target(self.staging().url())
                .credentials(&staging.access_key, staging.secret_key.expose()),
            |builder, key| builder.option(key, None),
        );

        RenderedCommand::of(&builder.build(), self.dialect)
    }

    pub fn load(&self) -> RenderedCommand {
        let staging = self.params.staging();
        let builder = LOAD_OPTIONS.iter().fold(
            CopyBuilder::new(self.params.table().clone())
                .source(self.staging().url())
                .credentials(&staging.access_key, staging.secret_key.expose()),
            |builder, key| builder.option(key, None),
        );

        RenderedCommand::of(&builder.build(), self.dialect)
    }

    pub fn truncate(&self) -> RenderedCommand {
        let ast = Truncate {
            table: self.params.table().clone(),
        };
        RenderedCommand::of(&ast, self.dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{
        core::secret::Secret,
        execution::{
            config::{MigrationConfig, StagingConfig},
            connection::WarehouseEndpoint,
        },
    };

    fn params(bucket: &str, access_key: &str, secret_key: &str, table: &str) -> TaskParams {
        let config = MigrationConfig {
            staging: StagingConfig {
                bucket: bucket.to_string(),
                access_key: access_key.to_string(),
                secret_key: Secret::new(secret_key),
            },
            source: WarehouseEndpoint::new("src", "u", "p"),
            destination: WarehouseEndpoint::new("dst", "u", "p"),
            database: "db".to_string(),
            schema: "s".to_string(),
            truncate_before_load: false,
        };
        TaskParams::new(&config, "s", table)
    }

    fn quote_count(sql: &str) -> usize {
        sql.matches('\'').count()
    }

    #[test]
    fn test_unload_command() {
        let params = params("b", "ak", "sk", "t");
        let unload = CommandBuilder::new(&params).unload();

        assert_eq!(
            unload.sql(),
            "UNLOAD ('SELECT * FROM s.t') TO 's3://b/s/t_' \
             CREDENTIALS 'aws_access_key_id=ak;aws_secret_access_key=sk' ESCAPE;"
        );
    }

    #[test]
    fn test_unload_rendering_is_deterministic() {
        let params = params("b", "ak", "sk", "t");
        let first = CommandBuilder::new(&params).unload();

        for _ in 0..5 {
            assert_eq!(CommandBuilder::new(&params).unload().sql(), first.sql());
        }
    }

    #[test]
    fn test_load_command_reads_the_unload_prefix() {
        let params = params("b", "ak", "sk", "t");
        let builder = CommandBuilder::new(&params);
        let load = builder.load();

        assert_eq!(
            load.sql(),
            "COPY s.t FROM 's3://b/s/t_' \
             CREDENTIALS 'aws_access_key_id=ak;aws_secret_access_key=sk' ESCAPE EXPLICIT_IDS;"
        );
        assert!(builder.unload().sql().contains("'s3://b/s/t_'"));
        assert!(load.sql().contains("'s3://b/s/t_'"));
    }

    #[test]
    fn test_truncate_command() {
        let params = params("b", "ak", "sk", "t");
        assert_eq!(CommandBuilder::new(&params).truncate().sql(), "TRUNCATE s.t;");
    }

    #[test]
    fn test_redacted_rendition_hides_credentials() {
        let params = params("b", "AKIAEXAMPLE", "very-secret", "t");
        let builder = CommandBuilder::new(&params);

        for command in [builder.unload(), builder.load()] {
            assert!(command.sql().contains("very-secret"));
            assert!(!command.redacted().contains("very-secret"));
            assert!(!command.redacted().contains("AKIAEXAMPLE"));
            assert!(!format!("{command}").contains("very-secret"));
            assert!(!format!("{command:?}").contains("very-secret"));
        }
    }

    #[test]
    fn test_quote_in_secret_is_not_escaped() {
        let params = params("b", "ak", "sk'x", "t");
        let builder = CommandBuilder::new(&params);

        for command in [builder.unload(), builder.load()] {
            assert!(command.sql().contains("aws_secret_access_key=sk'x'"));
            // an odd number of quotes leaves a literal unterminated
            assert_eq!(quote_count(command.sql()) % 2, 1);
        }
    }

    #[test]
    fn test_quote_in_table_name_breaks_select_literal() {
        let params = params("b", "ak", "sk", "o'brien");
        let unload = CommandBuilder::new(&params).unload();

        assert!(unload.sql().starts_with("UNLOAD ('SELECT * FROM s.o'brien')"));
        assert!(!unload.sql().contains("o''brien"));
    }
}
