//! Job templates: the reusable shape of a finished job.
//!
//! A template captures, per task, the processor, preset, options, and the
//! *output storage account name* — not the literal output asset id — so
//! that replays target the same account. Instantiating a template pairs
//! caller-supplied input assets positionally with the template's input
//! slots and yields a fresh unsubmitted [`JobDraft`].

use serde::{Deserialize, Serialize};

use crate::asset::{Asset, EncryptionOption};
use crate::job::{Job, JobDraft, JobState};
use crate::task::{MediaProcessor, TaskOptions};
use crate::types::EntityId;

/// Errors from deriving or instantiating a job template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Templates can only be derived from finished jobs.
    #[error("Job must be Finished to save as a template, but is {0}")]
    NotFinished(JobState),

    /// The supplied input assets do not fill the template's input slots.
    #[error("Template expects {expected} input asset(s), got {actual}")]
    AssetCountMismatch { expected: usize, actual: usize },

    /// A task in the source snapshot reports no output assets, so there
    /// is no output binding to capture.
    #[error("Task '{task}' has no output assets to template")]
    MissingOutput { task: String },
}

/// The reusable shape of one task within a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    /// Task name carried over from the source job.
    pub name: String,
    /// Processor to run.
    pub processor_id: EntityId,
    /// Preset configuration.
    pub preset: String,
    /// Submission options.
    pub options: TaskOptions,
    /// Number of input assets this task consumes.
    pub input_slots: usize,
    /// Name for output assets created on replay.
    pub output_name: String,
    /// Storage account targeted by the task's output. Preserved verbatim
    /// so replays land in the same account as the source job.
    pub output_storage_account_name: String,
    /// Encryption option for output assets created on replay.
    pub output_encryption: EncryptionOption,
}

/// A reusable job shape derived from a finished job. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTemplate {
    /// Service-assigned template id, once registered.
    pub id: Option<EntityId>,
    /// Template name.
    pub name: String,
    /// Task shapes in source-job order.
    pub task_templates: Vec<TaskTemplate>,
}

impl JobTemplate {
    /// Derive a template from a finished job snapshot.
    ///
    /// Fails with [`TemplateError::NotFinished`] for any other state.
    /// Each task's first output binding is captured. Drafts enforce at
    /// least one output before dispatch, but a `Job` is a wire snapshot
    /// and is not trusted: a task without outputs fails with
    /// [`TemplateError::MissingOutput`] rather than being assumed away.
    pub fn from_job(job: &Job, name: &str) -> Result<Self, TemplateError> {
        if job.state != JobState::Finished {
            return Err(TemplateError::NotFinished(job.state));
        }

        let mut task_templates = Vec::with_capacity(job.tasks.len());
        for task in &job.tasks {
            let output = task
                .output_assets
                .first()
                .ok_or_else(|| TemplateError::MissingOutput {
                    task: task.name.clone(),
                })?;
            task_templates.push(TaskTemplate {
                name: task.name.clone(),
                processor_id: task.processor_id.clone(),
                preset: task.preset.clone(),
                options: task.options,
                input_slots: task.input_asset_ids.len(),
                output_name: output.name.clone(),
                output_storage_account_name: output.storage_account_name.clone(),
                output_encryption: output.encryption,
            });
        }

        Ok(Self {
            id: None,
            name: name.to_string(),
            task_templates,
        })
    }

    /// Total number of input assets needed to instantiate this template.
    pub fn input_slots(&self) -> usize {
        self.task_templates.iter().map(|t| t.input_slots).sum()
    }

    /// Instantiate a fresh unsubmitted draft from this template.
    ///
    /// Input assets bind positionally: the first task consumes the first
    /// `input_slots` assets, the next task the following ones, and so on.
    /// A count mismatch fails with [`TemplateError::AssetCountMismatch`].
    /// Output assets are recreated targeting the template's preserved
    /// storage account names.
    pub fn instantiate(
        &self,
        job_name: &str,
        inputs: &[Asset],
    ) -> Result<JobDraft, TemplateError> {
        let expected = self.input_slots();
        if inputs.len() != expected {
            return Err(TemplateError::AssetCountMismatch {
                expected,
                actual: inputs.len(),
            });
        }

        let mut draft = JobDraft::new(job_name);
        let mut remaining = inputs;

        for shape in &self.task_templates {
            // Processor id is already resolved; reconstruct a processor
            // handle so the draft API stays uniform.
            let processor = MediaProcessor {
                id: shape.processor_id.clone(),
                name: String::new(),
                version: String::new(),
            };
            let task = draft.add_task(&shape.name, &processor, &shape.preset, shape.options);

            let (bound, rest) = remaining.split_at(shape.input_slots);
            remaining = rest;
            for asset in bound {
                task.add_input(asset.clone());
            }

            // The account binding was validated when the source job was
            // drafted; recreate the pending output without re-checking.
            task.push_output(Asset {
                id: format!("local:{}", uuid::Uuid::new_v4()),
                name: shape.output_name.clone(),
                storage_account_name: shape.output_storage_account_name.clone(),
                encryption: shape.output_encryption,
            });
        }

        Ok(draft)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use assert_matches::assert_matches;

    fn finished_job(output_account: &str) -> Job {
        Job {
            id: "job-1".to_string(),
            name: "Job 1".to_string(),
            state: JobState::Finished,
            created: None,
            tasks: vec![Task {
                name: "Task1".to_string(),
                processor_id: "proc-1".to_string(),
                preset: "H264 Adaptive".to_string(),
                options: TaskOptions::None,
                input_asset_ids: vec!["asset-1".to_string()],
                output_assets: vec![Asset {
                    id: "asset-2".to_string(),
                    name: "Output asset".to_string(),
                    storage_account_name: output_account.to_string(),
                    encryption: EncryptionOption::None,
                }],
            }],
        }
    }

    fn input() -> Asset {
        Asset {
            id: "asset-9".to_string(),
            name: "source.wmv".to_string(),
            storage_account_name: "primary".to_string(),
            encryption: EncryptionOption::StorageEncrypted,
        }
    }

    #[test]
    fn from_job_requires_finished() {
        for state in [JobState::Queued, JobState::Processing, JobState::Error] {
            let mut job = finished_job("coldstore");
            job.state = state;
            assert_matches!(
                JobTemplate::from_job(&job, "tpl"),
                Err(TemplateError::NotFinished(s)) if s == state
            );
        }
    }

    #[test]
    fn from_job_rejects_task_without_outputs() {
        // Snapshots come off the wire; a task reporting zero outputs
        // must be an error, not a panic.
        let mut job = finished_job("coldstore");
        job.tasks[0].output_assets.clear();
        assert_matches!(
            JobTemplate::from_job(&job, "tpl"),
            Err(TemplateError::MissingOutput { task }) if task == "Task1"
        );
    }

    #[test]
    fn template_preserves_output_account_name() {
        let template = JobTemplate::from_job(&finished_job("coldstore"), "tpl").unwrap();
        assert_eq!(template.task_templates.len(), 1);
        assert_eq!(
            template.task_templates[0].output_storage_account_name,
            "coldstore"
        );
    }

    #[test]
    fn template_captures_processor_and_preset() {
        let template = JobTemplate::from_job(&finished_job("coldstore"), "tpl").unwrap();
        let shape = &template.task_templates[0];
        assert_eq!(shape.processor_id, "proc-1");
        assert_eq!(shape.preset, "H264 Adaptive");
        assert_eq!(shape.input_slots, 1);
    }

    #[test]
    fn instantiate_binds_inputs_and_reuses_account() {
        let template = JobTemplate::from_job(&finished_job("coldstore"), "tpl").unwrap();
        let draft = template.instantiate("Job 2", &[input()]).unwrap();

        assert_eq!(draft.tasks().len(), 1);
        let task = &draft.tasks()[0];
        assert_eq!(task.input_assets().len(), 1);
        assert_eq!(task.input_assets()[0].id, "asset-9");
        assert_eq!(task.output_assets()[0].storage_account_name, "coldstore");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn instantiate_rejects_too_few_inputs() {
        let template = JobTemplate::from_job(&finished_job("coldstore"), "tpl").unwrap();
        assert_matches!(
            template.instantiate("Job 2", &[]),
            Err(TemplateError::AssetCountMismatch {
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn instantiate_rejects_too_many_inputs() {
        let template = JobTemplate::from_job(&finished_job("coldstore"), "tpl").unwrap();
        assert_matches!(
            template.instantiate("Job 2", &[input(), input()]),
            Err(TemplateError::AssetCountMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn multi_task_inputs_bind_positionally() {
        let mut job = finished_job("coldstore");
        let mut second = job.tasks[0].clone();
        second.name = "Task2".to_string();
        second.output_assets[0].storage_account_name = "archive".to_string();
        job.tasks.push(second);

        let template = JobTemplate::from_job(&job, "tpl").unwrap();
        assert_eq!(template.input_slots(), 2);

        let mut a = input();
        a.id = "asset-a".to_string();
        let mut b = input();
        b.id = "asset-b".to_string();

        let draft = template.instantiate("Job 2", &[a, b]).unwrap();
        assert_eq!(draft.tasks()[0].input_assets()[0].id, "asset-a");
        assert_eq!(draft.tasks()[1].input_assets()[0].id, "asset-b");
        assert_eq!(
            draft.tasks()[1].output_assets()[0].storage_account_name,
            "archive"
        );
    }
}
