//! Job submission: local validation, dispatch, structured failures.
//!
//! Local validation errors are never retried. An unknown storage account
//! is a permanent rejection surfaced as its own error kind (mapped from
//! the service's structured error code — never from message text) and is
//! likewise never retried. Transport failures carry enough context for
//! the caller to decide on retry; this module performs none itself.

use mediaq_core::error::CoreError;
use mediaq_core::job::{Job, JobDraft};

use crate::resources::JobSubmission;
use crate::service::{MediaService, ServiceError};

/// Failure modes of a job submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The draft failed local validation; nothing was dispatched.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// An output asset names a storage account unknown to the service.
    /// No job was created remotely; resubmitting the same draft fails
    /// identically.
    #[error("Cannot submit job '{job_name}': storage account '{account}' is unknown to the service")]
    InvalidStorageAccount { job_name: String, account: String },

    /// The service rejected the submission for another reason.
    #[error("Service rejected job '{job_name}' ({status}): {message}")]
    Rejected {
        job_name: String,
        status: u16,
        message: String,
    },

    /// Connectivity failure; whether the submission arrived is unknown.
    #[error("Transport failure submitting job '{job_name}': {message}")]
    Transport { job_name: String, message: String },
}

/// Validate and submit a draft.
///
/// On acceptance the returned [`Job`] is the service's queued snapshot:
/// server-assigned ids, state [`Queued`](mediaq_core::job::JobState::Queued),
/// and output-asset account bindings echoed verbatim. The draft's task
/// list is frozen into the job; nothing can be added after this point.
pub async fn submit_job(
    service: &dyn MediaService,
    draft: JobDraft,
) -> Result<Job, SubmitError> {
    draft.validate()?;

    let submission = JobSubmission::from_draft(&draft);
    match service.submit_job(submission).await {
        Ok(job) => {
            tracing::info!(
                job_id = %job.id,
                job_name = %job.name,
                state = %job.state,
                tasks = job.tasks.len(),
                "Job submitted",
            );
            Ok(job)
        }
        Err(ServiceError::StorageAccountNotFound { account }) => {
            tracing::warn!(
                job_name = %draft.name,
                account = %account,
                "Job rejected: unknown storage account",
            );
            Err(SubmitError::InvalidStorageAccount {
                job_name: draft.name.clone(),
                account,
            })
        }
        Err(ServiceError::Transport { message, .. }) => Err(SubmitError::Transport {
            job_name: draft.name.clone(),
            message,
        }),
        Err(ServiceError::Api {
            status, message, ..
        }) => Err(SubmitError::Rejected {
            job_name: draft.name.clone(),
            status,
            message,
        }),
        Err(ServiceError::NotFound { entity, id }) => Err(SubmitError::Rejected {
            job_name: draft.name.clone(),
            status: 404,
            message: format!("{entity} '{id}' not found"),
        }),
    }
}
