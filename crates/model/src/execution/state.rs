use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle of a single table migration.
///
/// ```text
/// Init -> Unloading -> Unloaded -> Loading -> Done
///             |                       |
///             +------> Failed <-------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Init,
    Unloading,
    Unloaded,
    Loading,
    Done,
    Failed,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Init => "init",
            TaskState::Unloading => "unloading",
            TaskState::Unloaded => "unloaded",
            TaskState::Loading => "loading",
            TaskState::Done => "done",
            TaskState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Done | TaskState::Failed)
    }

    pub fn can_transition_to(&self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (TaskState::Init, TaskState::Unloading)
                | (TaskState::Unloading, TaskState::Unloaded)
                | (TaskState::Unloading, TaskState::Failed)
                | (TaskState::Unloaded, TaskState::Loading)
                | (TaskState::Loading, TaskState::Done)
                | (TaskState::Loading, TaskState::Failed)
        )
    }

    /// The phase a non-terminal working state belongs to.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            TaskState::Unloading => Some(Phase::Unload),
            TaskState::Loading => Some(Phase::Load),
            _ => None,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Unload,
    Load,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Unload => "unload",
            Phase::Load => "load",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Illegal task transition: {from} -> {to}")]
pub struct IllegalTransition {
    pub from: TaskState,
    pub to: TaskState,
}

/// Current state of a task plus the path it took to get there.
#[derive(Debug, Clone)]
pub struct TaskLifecycle {
    state: TaskState,
    history: Vec<TaskState>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl Default for TaskLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskLifecycle {
    pub fn new() -> Self {
        Self {
            state: TaskState::Init,
            history: vec![TaskState::Init],
            started_at: None,
            finished_at: None,
        }
    }

    /// Moves to `next`. Leaving `Init` stamps the start time, reaching a
    /// terminal state stamps the finish time.
    pub fn advance(&mut self, next: TaskState) -> Result<(), IllegalTransition> {
        if !self.state.can_transition_to(next) {
            return Err(IllegalTransition {
                from: self.state,
                to: next,
            });
        }

        let now = Utc::now();
        if self.state == TaskState::Init {
            self.started_at = Some(now);
        }
        if next.is_terminal() {
            self.finished_at = Some(now);
        }

        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Forces the terminal `Failed` state from wherever the task is.
    ///
    /// Only used when the task can no longer follow its normal transitions
    /// (an illegal transition was attempted, or its unit of execution died).
    pub fn abort(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        let now = Utc::now();
        self.started_at.get_or_insert(now);
        self.finished_at = Some(now);
        self.state = TaskState::Failed;
        self.history.push(TaskState::Failed);
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn history(&self) -> &[TaskState] {
        &self.history
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut lifecycle = TaskLifecycle::new();
        for next in [
            TaskState::Unloading,
            TaskState::Unloaded,
            TaskState::Loading,
            TaskState::Done,
        ] {
            lifecycle.advance(next).unwrap();
        }

        assert_eq!(lifecycle.state(), TaskState::Done);
        assert_eq!(lifecycle.history().len(), 5);
        assert!(lifecycle.started_at().is_some());
        assert!(lifecycle.finished_at() >= lifecycle.started_at());
    }

    #[test]
    fn test_failed_is_reachable_only_from_working_states() {
        assert!(TaskState::Unloading.can_transition_to(TaskState::Failed));
        assert!(TaskState::Loading.can_transition_to(TaskState::Failed));
        assert!(!TaskState::Init.can_transition_to(TaskState::Failed));
        assert!(!TaskState::Unloaded.can_transition_to(TaskState::Failed));
    }

    #[test]
    fn test_load_cannot_follow_failure() {
        let mut lifecycle = TaskLifecycle::new();
        lifecycle.advance(TaskState::Unloading).unwrap();
        lifecycle.advance(TaskState::Failed).unwrap();

        let err = lifecycle.advance(TaskState::Loading).unwrap_err();
        assert_eq!(err.from, TaskState::Failed);
        assert_eq!(err.to, TaskState::Loading);
        assert_eq!(
            lifecycle.history(),
            &[TaskState::Init, TaskState::Unloading, TaskState::Failed]
        );
    }

    #[test]
    fn test_no_skipping_unload() {
        let mut lifecycle = TaskLifecycle::new();
        assert!(lifecycle.advance(TaskState::Loading).is_err());
        assert_eq!(lifecycle.state(), TaskState::Init);
    }

    #[test]
    fn test_abort_is_idempotent_on_terminal_states() {
        let mut lifecycle = TaskLifecycle::new();
        lifecycle.abort();
        lifecycle.abort();

        assert_eq!(lifecycle.state(), TaskState::Failed);
        assert_eq!(lifecycle.history(), &[TaskState::Init, TaskState::Failed]);
        assert!(lifecycle.finished_at().is_some());
    }

    #[test]
    fn test_phase_of_state() {
        assert_eq!(TaskState::Unloading.phase(), Some(Phase::Unload));
        assert_eq!(TaskState::Loading.phase(), Some(Phase::Load));
        assert_eq!(TaskState::Done.phase(), None);
    }
}
