//! Job drafting, the job state machine, and job snapshots.
//!
//! A [`JobDraft`] exists only in client memory; the service first sees it
//! when the client submits it. On acceptance the draft becomes a [`Job`]
//! snapshot in [`JobState::Queued`]; from then on the state is owned by
//! the service and is only mirrored locally via polling.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::task::{MediaProcessor, Task, TaskDraft, TaskOptions};
use crate::types::{EntityId, Timestamp};

/// Lifecycle state of a job.
///
/// `Unsubmitted -> (submit accepted) -> Queued -> Processing ->
/// {Finished | Error | Canceled}`. A rejected submit moves the draft to
/// `SubmissionFailed`, a local terminal state the service never sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobState {
    /// Draft only; not yet visible to the service.
    Unsubmitted,
    /// Submission was rejected before the job existed remotely. Local
    /// terminal state.
    SubmissionFailed,
    /// Accepted by the service and waiting to run.
    Queued,
    /// At least one task is running.
    Processing,
    /// All tasks completed successfully. Terminal.
    Finished,
    /// The job failed remotely. Terminal.
    Error,
    /// The job was canceled. Terminal.
    Canceled,
}

impl JobState {
    /// Whether the state is terminal (no further transitions).
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::SubmissionFailed | Self::Finished | Self::Error | Self::Canceled
        )
    }

    /// Whether the state is a remote terminal *failure* state.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Error | Self::Canceled)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unsubmitted => "Unsubmitted",
            Self::SubmissionFailed => "SubmissionFailed",
            Self::Queued => "Queued",
            Self::Processing => "Processing",
            Self::Finished => "Finished",
            Self::Error => "Error",
            Self::Canceled => "Canceled",
        };
        f.write_str(name)
    }
}

/// A job being assembled in client memory.
#[derive(Debug, Clone)]
pub struct JobDraft {
    /// Job name.
    pub name: String,
    tasks: Vec<TaskDraft>,
}

impl JobDraft {
    /// Start a new draft. Not yet visible to the service.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tasks: Vec::new(),
        }
    }

    /// Append a processing step and return it for input/output binding.
    pub fn add_task(
        &mut self,
        name: &str,
        processor: &MediaProcessor,
        preset: &str,
        options: TaskOptions,
    ) -> &mut TaskDraft {
        let index = self.tasks.len();
        self.tasks.push(TaskDraft::new(name, processor, preset, options));
        &mut self.tasks[index]
    }

    /// Tasks added so far, in order.
    pub fn tasks(&self) -> &[TaskDraft] {
        &self.tasks
    }

    /// Pre-dispatch validation.
    ///
    /// A submittable draft has a non-empty name, at least one task, and
    /// every task has at least one input and one output asset. Account
    /// *existence* is not checked here: the service is authoritative and
    /// rejects unknown accounts with a structured error.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Job name must not be empty".to_string(),
            ));
        }
        if self.tasks.is_empty() {
            return Err(CoreError::Validation(format!(
                "Job '{}' has no tasks",
                self.name
            )));
        }
        for task in &self.tasks {
            if task.name.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "Job '{}' contains a task with an empty name",
                    self.name
                )));
            }
            if task.input_assets().is_empty() {
                return Err(CoreError::Validation(format!(
                    "Task '{}' has no input assets",
                    task.name
                )));
            }
            if task.output_assets().is_empty() {
                return Err(CoreError::Validation(format!(
                    "Task '{}' has no output assets",
                    task.name
                )));
            }
        }
        Ok(())
    }
}

/// Immutable snapshot of a submitted job, as reported by the service.
///
/// The task list never changes after submission; only `state` moves, and
/// re-fetching yields a fresh snapshot rather than mutating this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Service-assigned job id.
    pub id: EntityId,
    /// Job name.
    pub name: String,
    /// Mirrored remote state at fetch time.
    pub state: JobState,
    /// When the service accepted the job, if reported.
    pub created: Option<Timestamp>,
    /// Tasks with their authoritative asset bindings.
    pub tasks: Vec<Task>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
