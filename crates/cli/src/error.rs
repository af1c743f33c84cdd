use crate::exit::ExitCode;
use connectors::error::WarehouseError;
use engine_runtime::error::MigrationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error("Failed to serialize the report to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Failed to write the report: {0}")]
    ReportWrite(#[from] std::io::Error),

    #[error("Connection test against {target} failed: {cause}")]
    ConnectionTest {
        target: &'static str,
        #[source]
        cause: WarehouseError,
    },
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Migration(MigrationError::Config(_)) => ExitCode::ConfigError,
            CliError::Migration(MigrationError::List(_)) => ExitCode::ListingFailed,
            _ => ExitCode::GeneralError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_config::error::ConfigError;
    use engine_runtime::error::ListError;

    #[test]
    fn test_exit_codes_by_error_kind() {
        let config = CliError::from(MigrationError::from(ConfigError::ValidationFailed(vec![
            "Missing required field: aws.s3_bucket".into(),
        ])));
        assert_eq!(config.exit_code(), ExitCode::ConfigError);
        assert_eq!(config.exit_code().as_u8(), 3);

        let list = CliError::from(MigrationError::from(ListError {
            schema: "s".into(),
            cause: WarehouseError::rejected("schema does not exist"),
        }));
        assert_eq!(list.exit_code(), ExitCode::ListingFailed);
        assert_eq!(list.exit_code().as_u8(), 2);

        let conn = CliError::ConnectionTest {
            target: "source",
            cause: WarehouseError::Closed,
        };
        assert_eq!(conn.exit_code(), ExitCode::GeneralError);
    }
}
