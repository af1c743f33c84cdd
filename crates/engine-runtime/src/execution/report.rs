use crate::{error::TaskError, execution::task::TaskOutcome};
use model::{
    execution::state::TaskLifecycle,
    report::summary::{TaskFailure, TaskSummary},
};
use tokio::task::JoinError;

impl TaskOutcome {
    /// Outcome for a task whose unit of execution died before handing back
    /// its own outcome. The lifecycle it had is lost with it.
    pub fn aborted(table: impl Into<String>, err: JoinError) -> Self {
        let table = table.into();
        let message = if err.is_panic() {
            "task panicked".to_string()
        } else {
            err.to_string()
        };

        let mut lifecycle = TaskLifecycle::new();
        lifecycle.abort();

        Self {
            result: Err(TaskError::Aborted {
                table: table.clone(),
                message,
            }),
            table,
            lifecycle,
        }
    }

    pub fn into_summary(self) -> TaskSummary {
        let duration_ms = match (self.lifecycle.started_at(), self.lifecycle.finished_at()) {
            (Some(start), Some(end)) => u64::try_from((end - start).num_milliseconds()).ok(),
            _ => None,
        };

        let failure = self.result.err().map(|err| TaskFailure {
            phase: err.phase(),
            message: err.to_string(),
        });

        TaskSummary {
            table: self.table,
            state: self.lifecycle.state(),
            history: self.lifecycle.history().to_vec(),
            started_at: self.lifecycle.started_at(),
            finished_at: self.lifecycle.finished_at(),
            duration_ms,
            failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connectors::error::WarehouseError;
    use model::execution::state::{Phase, TaskState};

    #[test]
    fn test_summary_of_done_task() {
        let mut lifecycle = TaskLifecycle::new();
        for next in [
            TaskState::Unloading,
            TaskState::Unloaded,
            TaskState::Loading,
            TaskState::Done,
        ] {
            lifecycle.advance(next).unwrap();
        }

        let outcome = TaskOutcome {
            table: "orders".into(),
            lifecycle,
            result: Ok(()),
        };
        let summary = outcome.into_summary();

        assert!(summary.succeeded());
        assert!(summary.failure.is_none());
        assert!(summary.duration_ms.is_some());
        assert_eq!(summary.history.len(), 5);
    }

    #[test]
    fn test_summary_of_failed_task_keeps_phase() {
        let mut lifecycle = TaskLifecycle::new();
        lifecycle.advance(TaskState::Unloading).unwrap();
        lifecycle.advance(TaskState::Failed).unwrap();

        let outcome = TaskOutcome {
            table: "orders".into(),
            lifecycle,
            result: Err(TaskError::Phase {
                phase: Phase::Unload,
                table: "orders".into(),
                cause: WarehouseError::rejected("permission denied"),
            }),
        };
        let summary = outcome.into_summary();

        assert_eq!(summary.state, TaskState::Failed);
        let failure = summary.failure.unwrap();
        assert_eq!(failure.phase, Some(Phase::Unload));
        assert!(failure.message.contains("permission denied"));
    }
}
