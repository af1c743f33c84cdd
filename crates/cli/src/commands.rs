use clap::{Args, Subcommand};

/// Where to read the migration settings from.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[arg(long, help = "Config file path (TOML)")]
    pub config: String,

    #[arg(
        long,
        help = "Optional .env file with REDSHIFT_MIGRATE_* overrides"
    )]
    pub env_file: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy every table of the schema to the destination cluster
    Migrate {
        #[command(flatten)]
        config: ConfigArgs,

        #[arg(long, help = "Schema to migrate, instead of the configured one")]
        schema: Option<String>,

        #[arg(
            long,
            help = "If specified, writes the JSON report to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Print the tables that would be migrated
    ListTables {
        #[command(flatten)]
        config: ConfigArgs,

        #[arg(long, help = "Schema to list, instead of the configured one")]
        schema: Option<String>,
    },
    /// Print the commands each table would run, with credentials masked
    Plan {
        #[command(flatten)]
        config: ConfigArgs,

        #[arg(long, help = "Schema to plan, instead of the configured one")]
        schema: Option<String>,

        #[arg(long, help = "Only plan this table; skips the catalog lookup")]
        table: Option<String>,
    },
    /// Check that both clusters accept connections
    TestConn {
        #[command(flatten)]
        config: ConfigArgs,
    },
}
