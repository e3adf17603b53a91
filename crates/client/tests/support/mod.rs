//! In-memory [`MediaService`] fake for integration tests.
//!
//! Enforces storage-account existence on asset creation and job
//! submission (rejecting with the structured not-found kind, without
//! creating anything), assigns sequential ids, and advances each job
//! through a configurable state script on successive fetches — once the
//! script is exhausted the state holds, which models a job that never
//! reaches a target.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use mediaq_core::account::StorageAccount;
use mediaq_core::asset::Asset;
use mediaq_core::job::{Job, JobState};
use mediaq_core::task::{MediaProcessor, Task};

use mediaq_client::resources::{JobSubmission, NewAssetRequest, TemplateResource};
use mediaq_client::service::{MediaService, ServiceError};

pub struct FakeMediaService {
    state: Mutex<FakeState>,
}

struct FakeState {
    accounts: Vec<StorageAccount>,
    processors: Vec<MediaProcessor>,
    /// States each newly submitted job steps through on fetches.
    script: Vec<JobState>,
    next_id: u64,
    jobs: HashMap<String, StoredJob>,
    templates: Vec<TemplateResource>,
}

struct StoredJob {
    snapshot: Job,
    pending: VecDeque<JobState>,
}

impl FakeMediaService {
    /// Fake with the given accounts, one "Media Encoder" processor, and
    /// a default script of `Processing -> Finished`.
    pub fn new(accounts: Vec<StorageAccount>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                accounts,
                processors: vec![MediaProcessor {
                    id: "proc-encoder".to_string(),
                    name: "Media Encoder".to_string(),
                    version: "1.0".to_string(),
                }],
                script: vec![JobState::Processing, JobState::Finished],
                next_id: 0,
                jobs: HashMap::new(),
                templates: Vec::new(),
            }),
        }
    }

    /// Override the state script applied to jobs submitted afterwards.
    pub fn set_script(&self, script: Vec<JobState>) {
        self.state.lock().unwrap().script = script;
    }

    /// Number of jobs the service has accepted.
    pub fn job_count(&self) -> usize {
        self.state.lock().unwrap().jobs.len()
    }

    /// Number of templates the service has stored.
    pub fn template_count(&self) -> usize {
        self.state.lock().unwrap().templates.len()
    }
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn account_known(&self, name: &str) -> bool {
        self.accounts.iter().any(|a| a.name == name)
    }
}

#[async_trait]
impl MediaService for FakeMediaService {
    async fn storage_accounts(&self) -> Result<Vec<StorageAccount>, ServiceError> {
        Ok(self.state.lock().unwrap().accounts.clone())
    }

    async fn processors(&self) -> Result<Vec<MediaProcessor>, ServiceError> {
        Ok(self.state.lock().unwrap().processors.clone())
    }

    async fn create_asset(&self, request: NewAssetRequest) -> Result<Asset, ServiceError> {
        let mut state = self.state.lock().unwrap();
        if !state.account_known(&request.storage_account_name) {
            return Err(ServiceError::StorageAccountNotFound {
                account: request.storage_account_name,
            });
        }
        let id = state.next_id("asset");
        Ok(Asset {
            id,
            name: request.name,
            storage_account_name: request.storage_account_name,
            encryption: request.encryption,
        })
    }

    async fn submit_job(&self, submission: JobSubmission) -> Result<Job, ServiceError> {
        let mut state = self.state.lock().unwrap();

        // Reject before creating anything: a failed submission must be
        // idempotent and leave no job behind.
        for task in &submission.tasks {
            for output in &task.output_assets {
                if !state.account_known(&output.storage_account_name) {
                    return Err(ServiceError::StorageAccountNotFound {
                        account: output.storage_account_name.clone(),
                    });
                }
            }
        }

        let job_id = state.next_id("job");
        let tasks = submission
            .tasks
            .iter()
            .map(|task| Task {
                name: task.name.clone(),
                processor_id: task.processor_id.clone(),
                preset: task.preset.clone(),
                options: task.options,
                input_asset_ids: task.input_asset_ids.clone(),
                output_assets: task
                    .output_assets
                    .iter()
                    .map(|spec| Asset {
                        id: state.next_id("asset"),
                        name: spec.name.clone(),
                        // Echoed verbatim: fetches must round-trip the
                        // account name exactly as submitted.
                        storage_account_name: spec.storage_account_name.clone(),
                        encryption: spec.encryption,
                    })
                    .collect(),
            })
            .collect();

        let snapshot = Job {
            id: job_id.clone(),
            name: submission.name,
            state: JobState::Queued,
            created: None,
            tasks,
        };
        let pending: VecDeque<JobState> = state.script.iter().copied().collect();
        state.jobs.insert(
            job_id,
            StoredJob {
                snapshot: snapshot.clone(),
                pending,
            },
        );
        Ok(snapshot)
    }

    async fn get_job(&self, job_id: &str) -> Result<Job, ServiceError> {
        let mut state = self.state.lock().unwrap();
        let stored = state.jobs.get_mut(job_id).ok_or(ServiceError::NotFound {
            entity: "job",
            id: job_id.to_string(),
        })?;
        if let Some(next) = stored.pending.pop_front() {
            stored.snapshot.state = next;
        }
        Ok(stored.snapshot.clone())
    }

    async fn cancel_job(&self, job_id: &str) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        let stored = state.jobs.get_mut(job_id).ok_or(ServiceError::NotFound {
            entity: "job",
            id: job_id.to_string(),
        })?;
        stored.pending.clear();
        stored.snapshot.state = JobState::Canceled;
        Ok(())
    }

    async fn save_template(
        &self,
        job_id: &str,
        name: &str,
    ) -> Result<TemplateResource, ServiceError> {
        let mut state = self.state.lock().unwrap();
        if !state.jobs.contains_key(job_id) {
            return Err(ServiceError::NotFound {
                entity: "job",
                id: job_id.to_string(),
            });
        }
        let resource = TemplateResource {
            id: state.next_id("tpl"),
            name: name.to_string(),
        };
        state.templates.push(resource.clone());
        Ok(resource)
    }
}
