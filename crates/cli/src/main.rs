use crate::{commands::ConfigArgs, error::CliError, exit::ExitCode};
use clap::Parser;
use commands::Commands;
use engine_config::{env::EnvManager, loader};
use engine_runtime::{
    error::MigrationError,
    execution::executor::{self, MigrationExecutor},
};
use model::execution::{config::MigrationConfig, params::TaskParams};
use planner::command::CommandBuilder;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod error;
mod exit;
mod output;

#[derive(Parser, Debug)]
#[command(
    name = "redshift-migrate",
    version = "0.1.0",
    about = "Copies every table of a Redshift schema to another cluster through S3"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log filter, used when RUST_LOG is not set"
    )]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli.command).await {
        Ok(code) => code.into(),
        Err(err) => {
            error!("{err}");
            err.exit_code().into()
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    // stdout is reserved for reports and listings
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands) -> Result<ExitCode, CliError> {
    match command {
        Commands::Migrate {
            config,
            schema,
            output,
        } => {
            let config = load_config(&config, schema)?;
            info!(
                "Migrating schema {} from {} to {}",
                config.schema, config.source, config.destination
            );

            let schema = config.schema.clone();
            let report = executor::run(Arc::new(config), &schema).await?;

            match output {
                Some(path) => {
                    output::write_report(&report, &path).await?;
                    info!("Report written to {path}");
                }
                None => output::print_report(&report)?,
            }

            info!(
                "Run {} of schema {} took {} ms",
                report.run_id(),
                report.schema(),
                (report.finished_at() - report.started_at()).num_milliseconds()
            );
            Ok(ExitCode::for_report(&report))
        }
        Commands::ListTables { config, schema } => {
            let config = load_config(&config, schema)?;
            for table in list_tables(config).await? {
                println!("{table}");
            }
            Ok(ExitCode::Success)
        }
        Commands::Plan {
            config,
            schema,
            table,
        } => {
            let config = load_config(&config, schema)?;
            let tables = match table {
                Some(table) => vec![table],
                None => list_tables(config.clone()).await?,
            };

            for table in &tables {
                print_plan(&config, table);
            }
            Ok(ExitCode::Success)
        }
        Commands::TestConn { config } => {
            let config = load_config(&config, None)?;
            conn::ping_all(&config).await?;
            Ok(ExitCode::Success)
        }
    }
}

fn load_config(args: &ConfigArgs, schema: Option<String>) -> Result<MigrationConfig, CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = &args.env_file {
        env.load_from_file(path).map_err(MigrationError::from)?;
    }

    let config = loader::load(&args.config, &env).map_err(MigrationError::from)?;
    Ok(match schema {
        Some(schema) => config.with_schema(schema),
        None => config,
    })
}

async fn list_tables(config: MigrationConfig) -> Result<Vec<String>, CliError> {
    let schema = config.schema.clone();
    let tables = MigrationExecutor::redshift(Arc::new(config))
        .list_tables(&schema)
        .await
        .map_err(MigrationError::from)?;
    Ok(tables)
}

fn print_plan(config: &MigrationConfig, table: &str) {
    let params = TaskParams::new(config, config.schema.as_str(), table);
    let builder = CommandBuilder::new(&params);

    println!("-- {}", params.table());
    println!("{}", builder.unload());
    if params.truncate_before_load() {
        println!("{}", builder.truncate());
    }
    println!("{}", builder.load());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_migrate_with_overrides() {
        let cli = Cli::try_parse_from([
            "redshift-migrate",
            "migrate",
            "--config",
            "migrate.toml",
            "--schema",
            "sales",
            "--env-file",
            ".env",
            "--output",
            "report.json",
        ])
        .unwrap();

        assert_eq!(cli.log_level, "info");
        match cli.command {
            Commands::Migrate {
                config,
                schema,
                output,
            } => {
                assert_eq!(config.config, "migrate.toml");
                assert_eq!(config.env_file.as_deref(), Some(".env"));
                assert_eq!(schema.as_deref(), Some("sales"));
                assert_eq!(output.as_deref(), Some("report.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_log_level_is_global() {
        let cli = Cli::try_parse_from([
            "redshift-migrate",
            "list-tables",
            "--config",
            "migrate.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Commands::ListTables { .. }));
    }

    #[test]
    fn test_plan_accepts_single_table() {
        let cli = Cli::try_parse_from([
            "redshift-migrate",
            "plan",
            "--config",
            "migrate.toml",
            "--table",
            "orders",
        ])
        .unwrap();

        match cli.command {
            Commands::Plan { table, schema, .. } => {
                assert_eq!(table.as_deref(), Some("orders"));
                assert!(schema.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_config_is_required() {
        assert!(Cli::try_parse_from(["redshift-migrate", "migrate"]).is_err());
        assert!(Cli::try_parse_from(["redshift-migrate", "test-conn"]).is_err());
    }

    #[test]
    fn test_missing_config_file_maps_to_config_exit_code() {
        let args = ConfigArgs {
            config: "/nonexistent/migrate.toml".into(),
            env_file: None,
        };
        let err = load_config(&args, None).unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::ConfigError);
    }

    #[test]
    fn test_schema_flag_overrides_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"
[aws]
s3_bucket = "b"
access_key = "ak"
secret_key = "sk"

[redshift]
source_host = "src"
source_user = "su"
source_password = "sp"
dest_host = "dst"
dest_user = "du"
dest_password = "dp"
dbname = "db"
schema = "public"
"#,
        )
        .unwrap();

        let args = ConfigArgs {
            config: file.path().to_string_lossy().into_owned(),
            env_file: None,
        };
        let config = load_config(&args, Some("sales".into())).unwrap();
        assert_eq!(config.schema, "sales");
        assert_eq!(config.staging.bucket, "b");
    }
}
