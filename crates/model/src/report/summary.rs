use crate::{
    core::identifiers::RunId,
    execution::state::{Phase, TaskState},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Why a table did not make it to `Done`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// `None` when the task died outside of a phase (panic, illegal transition).
    pub phase: Option<Phase>,
    pub message: String,
}

/// Final record of one table's migration.
#[derive(Serialize, Debug, Clone)]
pub struct TaskSummary {
    pub table: String,
    pub state: TaskState,
    pub history: Vec<TaskState>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<TaskFailure>,
}

impl TaskSummary {
    pub fn succeeded(&self) -> bool {
        self.state == TaskState::Done
    }
}

/// Aggregate outcome of one migration run.
///
/// Counts are derived from the task summaries on construction, so
/// `failed > 0` and `success == false` always agree.
#[derive(Serialize, Debug, Clone)]
pub struct RunReport {
    run_id: RunId,
    schema: String,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    total: usize,
    succeeded: usize,
    failed: usize,
    success: bool,
    tasks: Vec<TaskSummary>,
}

impl RunReport {
    pub fn new(
        run_id: RunId,
        schema: impl Into<String>,
        started_at: DateTime<Utc>,
        tasks: Vec<TaskSummary>,
    ) -> Self {
        let succeeded = tasks.iter().filter(|t| t.succeeded()).count();
        let failed = tasks.len() - succeeded;

        Self {
            run_id,
            schema: schema.into(),
            started_at,
            finished_at: Utc::now(),
            total: tasks.len(),
            succeeded,
            failed,
            success: failed == 0,
            tasks,
        }
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn tasks(&self) -> &[TaskSummary] {
        &self.tasks
    }

    pub fn task(&self, table: &str) -> Option<&TaskSummary> {
        self.tasks.iter().find(|t| t.table == table)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &TaskFailure)> {
        self.tasks
            .iter()
            .filter_map(|t| t.failure.as_ref().map(|f| (t.table.as_str(), f)))
    }
}
