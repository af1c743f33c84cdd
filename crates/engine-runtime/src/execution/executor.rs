use crate::{
    error::{ListError, MigrationError},
    execution::task::{MigrationTask, TaskOutcome},
};
use chrono::Utc;
use futures_util::{StreamExt, stream::FuturesUnordered};
use connectors::{
    redshift::{catalog::RedshiftTableLister, connection::RedshiftConnector},
    warehouse::{TableLister, WarehouseConnector},
};
use model::{
    core::identifiers::RunId,
    execution::{config::MigrationConfig, params::TaskParams},
    report::summary::RunReport,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, info_span};

/// Migrates every table of `schema` against real Redshift endpoints.
pub async fn run(config: Arc<MigrationConfig>, schema: &str) -> Result<RunReport, MigrationError> {
    MigrationExecutor::redshift(config).run(schema).await
}

pub struct MigrationExecutor {
    config: Arc<MigrationConfig>,
    lister: Arc<dyn TableLister>,
    connector: Arc<dyn WarehouseConnector>,
}

impl MigrationExecutor {
    pub fn new(
        config: Arc<MigrationConfig>,
        lister: Arc<dyn TableLister>,
        connector: Arc<dyn WarehouseConnector>,
    ) -> Self {
        Self {
            config,
            lister,
            connector,
        }
    }

    /// Lists tables from the source catalog and opens task connections
    /// through the Redshift connector.
    pub fn redshift(config: Arc<MigrationConfig>) -> Self {
        let lister = RedshiftTableLister::new(config.source.clone(), config.database.clone());
        Self::new(config, Arc::new(lister), Arc::new(RedshiftConnector))
    }

    pub async fn list_tables(&self, schema: &str) -> Result<Vec<String>, ListError> {
        self.lister
            .list_tables(schema)
            .await
            .map_err(|cause| ListError {
                schema: schema.to_string(),
                cause,
            })
    }

    /// One task per listed table, all running at once. Returns when every
    /// task has reached a terminal state.
    ///
    /// Only a listing failure is an `Err`; table failures are reported in
    /// the returned report.
    pub async fn run(&self, schema: &str) -> Result<RunReport, MigrationError> {
        let run_id = RunId::generate();
        let started_at = Utc::now();
        info!("Migration run ID: {run_id}");

        let tables = self.list_tables(schema).await.inspect_err(|err| {
            error!("{err}");
        })?;
        info!("Found {} tables in schema {schema}", tables.len());

        let handles = self.spawn_tasks(schema, &tables);
        info!("Waiting for {} tasks to finish", handles.len());

        // completions are logged as they happen; the report keeps listing order
        let mut pending: FuturesUnordered<_> = handles
            .into_iter()
            .enumerate()
            .map(|(idx, (table, handle))| async move {
                match handle.await {
                    Ok(outcome) => (idx, outcome),
                    Err(err) => (idx, TaskOutcome::aborted(table, err)),
                }
            })
            .collect();

        let mut finished = Vec::with_capacity(pending.len());
        while let Some((idx, outcome)) = pending.next().await {
            log_completion(&outcome);
            finished.push((idx, outcome.into_summary()));
        }
        finished.sort_by_key(|(idx, _)| *idx);
        let summaries = finished.into_iter().map(|(_, summary)| summary).collect();

        let report = RunReport::new(run_id, schema, started_at, summaries);
        info!(
            "Migration of schema {schema} finished: {} of {} tables migrated, {} failed",
            report.succeeded(),
            report.total(),
            report.failed()
        );
        for (table, failure) in report.failures() {
            let phase = failure.phase.map_or("task", |phase| phase.as_str());
            error!("Failed table {table} ({phase}): {}", failure.message);
        }

        Ok(report)
    }

    fn spawn_tasks(
        &self,
        schema: &str,
        tables: &[String],
    ) -> Vec<(String, JoinHandle<TaskOutcome>)> {
        tables
            .iter()
            .map(|table| {
                info!("Spawning task for {schema}.{table}");
                let params = TaskParams::new(&self.config, schema, table.as_str());
                let task = MigrationTask::new(params, self.connector.clone());
                let span = info_span!("task", schema = %schema, table = %table);
                let handle = tokio::spawn(task.run().instrument(span));
                (table.clone(), handle)
            })
            .collect()
    }
}

fn log_completion(outcome: &TaskOutcome) {
    match &outcome.result {
        Ok(()) => info!("Task for {} finished: {}", outcome.table, outcome.lifecycle.state()),
        Err(err) => error!(
            "Task for {} finished: {} ({err})",
            outcome.table,
            outcome.lifecycle.state()
        ),
    }
}
