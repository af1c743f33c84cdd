use crate::error::TaskError;
use connectors::{
    error::WarehouseError,
    warehouse::{WarehouseConnection, WarehouseConnector},
};
use model::execution::{
    connection::WarehouseEndpoint,
    params::TaskParams,
    state::{Phase, TaskLifecycle, TaskState},
};
use planner::command::CommandBuilder;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Moves one table from the source warehouse to the destination through the
/// staging prefix: UNLOAD on the source, then COPY on the destination.
pub struct MigrationTask {
    params: TaskParams,
    connector: Arc<dyn WarehouseConnector>,
    lifecycle: TaskLifecycle,
}

/// What a task leaves behind once it reaches a terminal state.
#[derive(Debug)]
pub struct TaskOutcome {
    pub table: String,
    pub lifecycle: TaskLifecycle,
    pub result: Result<(), TaskError>,
}

impl MigrationTask {
    pub fn new(params: TaskParams, connector: Arc<dyn WarehouseConnector>) -> Self {
        Self {
            params,
            connector,
            lifecycle: TaskLifecycle::new(),
        }
    }

    pub fn state(&self) -> TaskState {
        self.lifecycle.state()
    }

    /// Runs both phases and consumes the task. Never returns early with an
    /// error: failures are folded into the outcome.
    pub async fn run(mut self) -> TaskOutcome {
        let result = self.unload().await;
        let result = match result {
            Ok(()) => self.load().await,
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            error!("{err}");
        }

        TaskOutcome {
            table: self.params.table_name().to_string(),
            lifecycle: self.lifecycle,
            result,
        }
    }

    /// UNLOAD phase. Ends in `Unloaded` on success and `Failed` otherwise.
    ///
    /// Success means the source accepted the command, not that every staged
    /// file is in place yet. The source session is closed without a commit.
    pub async fn unload(&mut self) -> Result<(), TaskError> {
        self.transition(TaskState::Unloading)?;
        info!("Starting unload");

        let endpoint = self.params.source().clone();
        let outcome = self.run_phase(Phase::Unload, &endpoint).await;
        self.finish_phase(Phase::Unload, outcome, TaskState::Unloaded)?;

        info!("Unload command accepted");
        Ok(())
    }

    /// LOAD phase. Only legal once the table has been unloaded.
    pub async fn load(&mut self) -> Result<(), TaskError> {
        self.transition(TaskState::Loading)?;
        info!("Starting load");

        let endpoint = self.params.destination().clone();
        let outcome = self.run_phase(Phase::Load, &endpoint).await;
        self.finish_phase(Phase::Load, outcome, TaskState::Done)?;

        info!("Load committed");
        Ok(())
    }

    async fn run_phase(
        &self,
        phase: Phase,
        endpoint: &WarehouseEndpoint,
    ) -> Result<(), WarehouseError> {
        let mut conn = self
            .connector
            .connect(endpoint, self.params.database())
            .await?;

        let submitted = match phase {
            Phase::Unload => self.submit_unload(conn.as_mut()).await,
            Phase::Load => self.submit_load(conn.as_mut()).await,
        };

        if let Err(err) = conn.close().await {
            warn!("Failed to close {phase} connection to {endpoint}: {err}");
        }

        submitted
    }

    async fn submit_unload(&self, conn: &mut dyn WarehouseConnection) -> Result<(), WarehouseError> {
        let command = CommandBuilder::new(&self.params).unload();
        debug!("Executing: {command}");
        conn.execute(command.sql()).await
    }

    async fn submit_load(&self, conn: &mut dyn WarehouseConnection) -> Result<(), WarehouseError> {
        let builder = CommandBuilder::new(&self.params);

        if self.params.truncate_before_load() {
            let truncate = builder.truncate();
            debug!("Executing: {truncate}");
            conn.execute(truncate.sql()).await?;
        }

        let command = builder.load();
        debug!("Executing: {command}");
        conn.execute(command.sql()).await?;
        conn.commit().await?;

        for notice in conn.notices() {
            debug!("Server notice: {notice}");
        }
        Ok(())
    }

    fn finish_phase(
        &mut self,
        phase: Phase,
        outcome: Result<(), WarehouseError>,
        next: TaskState,
    ) -> Result<(), TaskError> {
        match outcome {
            Ok(()) => self.transition(next),
            Err(cause) => {
                self.transition(TaskState::Failed)?;
                Err(TaskError::Phase {
                    phase,
                    table: self.params.table_name().to_string(),
                    cause,
                })
            }
        }
    }

    fn transition(&mut self, next: TaskState) -> Result<(), TaskError> {
        match self.lifecycle.advance(next) {
            Ok(()) => {
                debug!("State: {next}");
                Ok(())
            }
            Err(illegal) => {
                self.lifecycle.abort();
                Err(TaskError::Aborted {
                    table: self.params.table_name().to_string(),
                    message: illegal.to_string(),
                })
            }
        }
    }
}
