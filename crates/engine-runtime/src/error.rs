use connectors::error::WarehouseError;
use engine_config::error::ConfigError;
use model::execution::state::Phase;
use thiserror::Error;

/// Run-level errors. Any of these aborts the whole run.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The source catalog could not be listed; no task was started.
    #[error(transparent)]
    List(#[from] ListError),
}

#[derive(Debug, Error)]
#[error("Failed to list tables of schema {schema}: {cause}")]
pub struct ListError {
    pub schema: String,
    #[source]
    pub cause: WarehouseError,
}

/// Why a single table migration stopped. Stays inside that task's outcome.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The warehouse refused a connection or command during a phase.
    #[error("{phase} of {table} failed: {cause}")]
    Phase {
        phase: Phase,
        table: String,
        #[source]
        cause: WarehouseError,
    },

    /// The task could not run to a terminal state on its own: it panicked
    /// or attempted an illegal state transition.
    #[error("Task for {table} aborted: {message}")]
    Aborted { table: String, message: String },
}

impl TaskError {
    pub fn phase(&self) -> Option<Phase> {
        match self {
            TaskError::Phase { phase, .. } => Some(*phase),
            TaskError::Aborted { .. } => None,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            TaskError::Phase { table, .. } | TaskError::Aborted { table, .. } => table,
        }
    }
}
