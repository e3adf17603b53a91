//! The remote-service seam.
//!
//! [`MediaService`] abstracts the consumed REST surface so that the
//! submitter, poller, and template engine depend on behavior rather than
//! HTTP. The production implementation is [`MediaApi`]; tests drive an
//! in-memory fake. [`ServiceError`] is the structured error vocabulary:
//! unknown storage accounts are a distinct kind, mapped from the wire
//! error *code*, never from message text.

use async_trait::async_trait;

use mediaq_core::account::StorageAccount;
use mediaq_core::asset::Asset;
use mediaq_core::job::Job;
use mediaq_core::task::MediaProcessor;

use crate::api::{MediaApi, MediaApiError};
use crate::resources::{
    JobSubmission, NewAssetRequest, TemplateResource, CODE_JOB_NOT_FOUND,
    CODE_STORAGE_ACCOUNT_NOT_FOUND,
};

/// Errors surfaced by a [`MediaService`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service does not know the referenced storage account.
    /// Permanent rejection; never retried.
    #[error("Storage account '{account}' is unknown to the service")]
    StorageAccountNotFound {
        /// Account name as reported by the service, when available.
        account: String,
    },

    /// The requested entity does not exist on the service.
    #[error("{entity} '{id}' not found on the service")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    /// The service rejected the request for another reason.
    #[error("Service rejected {operation} ({status}): {message}")]
    Api {
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// Connectivity failure. Retry is caller policy; this library never
    /// retries automatically.
    #[error("Transport failure during {operation}: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },
}

/// Consumed surface of the remote media-processing service.
#[async_trait]
pub trait MediaService: Send + Sync {
    /// List the storage accounts attached to the media account.
    async fn storage_accounts(&self) -> Result<Vec<StorageAccount>, ServiceError>;

    /// List available media processors.
    async fn processors(&self) -> Result<Vec<MediaProcessor>, ServiceError>;

    /// Register a new asset and return its service-side handle.
    async fn create_asset(&self, request: NewAssetRequest) -> Result<Asset, ServiceError>;

    /// Submit a job; on acceptance returns the queued job snapshot with
    /// server-assigned ids.
    async fn submit_job(&self, submission: JobSubmission) -> Result<Job, ServiceError>;

    /// Fetch the authoritative snapshot of a job.
    async fn get_job(&self, job_id: &str) -> Result<Job, ServiceError>;

    /// Request cancellation of a queued or running job.
    async fn cancel_job(&self, job_id: &str) -> Result<(), ServiceError>;

    /// Register a job's shape as a reusable template.
    async fn save_template(&self, job_id: &str, name: &str)
        -> Result<TemplateResource, ServiceError>;
}

/// Map a REST-layer error onto the structured service vocabulary.
///
/// The storage-account code takes the offending account name from the
/// envelope's `target` field; the legacy message substring is ignored.
fn map_api_error(operation: &'static str, err: MediaApiError) -> ServiceError {
    match err {
        MediaApiError::Request(e) => ServiceError::Transport {
            operation,
            message: e.to_string(),
        },
        MediaApiError::Api {
            status,
            code,
            message,
            target,
        } => match code.as_deref() {
            Some(CODE_STORAGE_ACCOUNT_NOT_FOUND) => ServiceError::StorageAccountNotFound {
                account: target.unwrap_or_else(|| "<unspecified>".to_string()),
            },
            Some(CODE_JOB_NOT_FOUND) => ServiceError::NotFound {
                entity: "job",
                id: target.unwrap_or_default(),
            },
            _ => ServiceError::Api {
                operation,
                status,
                message,
            },
        },
    }
}

/// Error mapping specific to `get_job`.
///
/// A 404 on the job resource means the job does not exist, even when the
/// envelope carries no structured code; the requested id stands in for a
/// missing `target` so poll-side reporting names the right job.
fn map_get_job_error(job_id: &str, err: MediaApiError) -> ServiceError {
    match map_api_error("get_job", err) {
        ServiceError::NotFound { entity, id } if id.is_empty() => ServiceError::NotFound {
            entity,
            id: job_id.to_string(),
        },
        ServiceError::Api { status: 404, .. } => ServiceError::NotFound {
            entity: "job",
            id: job_id.to_string(),
        },
        other => other,
    }
}

#[async_trait]
impl MediaService for MediaApi {
    async fn storage_accounts(&self) -> Result<Vec<StorageAccount>, ServiceError> {
        let resources = self
            .list_storage_accounts()
            .await
            .map_err(|e| map_api_error("list_storage_accounts", e))?;
        Ok(resources.into_iter().map(Into::into).collect())
    }

    async fn processors(&self) -> Result<Vec<MediaProcessor>, ServiceError> {
        self.list_processors()
            .await
            .map_err(|e| map_api_error("list_processors", e))
    }

    async fn create_asset(&self, request: NewAssetRequest) -> Result<Asset, ServiceError> {
        MediaApi::create_asset(self, &request)
            .await
            .map_err(|e| map_api_error("create_asset", e))
    }

    async fn submit_job(&self, submission: JobSubmission) -> Result<Job, ServiceError> {
        MediaApi::submit_job(self, &submission)
            .await
            .map_err(|e| map_api_error("submit_job", e))
    }

    async fn get_job(&self, job_id: &str) -> Result<Job, ServiceError> {
        MediaApi::get_job(self, job_id)
            .await
            .map_err(|e| map_get_job_error(job_id, e))
    }

    async fn cancel_job(&self, job_id: &str) -> Result<(), ServiceError> {
        MediaApi::cancel_job(self, job_id)
            .await
            .map_err(|e| map_api_error("cancel_job", e))
    }

    async fn save_template(
        &self,
        job_id: &str,
        name: &str,
    ) -> Result<TemplateResource, ServiceError> {
        MediaApi::save_template(self, job_id, name)
            .await
            .map_err(|e| map_api_error("save_template", e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn storage_account_code_maps_to_distinct_error() {
        let err = map_api_error(
            "submit_job",
            MediaApiError::Api {
                status: 400,
                code: Some(CODE_STORAGE_ACCOUNT_NOT_FOUND.to_string()),
                message: "Cannot find the storage account".to_string(),
                target: Some("coldstore".to_string()),
            },
        );
        assert_matches!(
            err,
            ServiceError::StorageAccountNotFound { account } if account == "coldstore"
        );
    }

    #[test]
    fn storage_account_code_without_target_still_maps() {
        let err = map_api_error(
            "submit_job",
            MediaApiError::Api {
                status: 400,
                code: Some(CODE_STORAGE_ACCOUNT_NOT_FOUND.to_string()),
                message: "Cannot find the storage account".to_string(),
                target: None,
            },
        );
        assert_matches!(err, ServiceError::StorageAccountNotFound { .. });
    }

    #[test]
    fn message_text_alone_is_not_matched() {
        // The legacy contract matched on the message substring; the
        // redesigned mapping requires the structured code.
        let err = map_api_error(
            "submit_job",
            MediaApiError::Api {
                status: 400,
                code: None,
                message: "Cannot find the storage account".to_string(),
                target: None,
            },
        );
        assert_matches!(err, ServiceError::Api { .. });
    }

    #[test]
    fn job_not_found_code_maps_to_not_found() {
        let err = map_api_error(
            "get_job",
            MediaApiError::Api {
                status: 404,
                code: Some(CODE_JOB_NOT_FOUND.to_string()),
                message: "no such job".to_string(),
                target: Some("job-42".to_string()),
            },
        );
        assert_matches!(
            err,
            ServiceError::NotFound { entity: "job", id } if id == "job-42"
        );
    }

    #[test]
    fn plain_404_on_get_job_maps_to_not_found() {
        // Some deployments answer a missing job with a bare 404 and no
        // structured code; the poller still needs a not-found, not a
        // generic rejection.
        let err = map_get_job_error(
            "job-42",
            MediaApiError::Api {
                status: 404,
                code: None,
                message: "not found".to_string(),
                target: None,
            },
        );
        assert_matches!(
            err,
            ServiceError::NotFound { entity: "job", id } if id == "job-42"
        );
    }

    #[test]
    fn get_job_fills_missing_target_with_requested_id() {
        let err = map_get_job_error(
            "job-42",
            MediaApiError::Api {
                status: 404,
                code: Some(CODE_JOB_NOT_FOUND.to_string()),
                message: "no such job".to_string(),
                target: None,
            },
        );
        assert_matches!(
            err,
            ServiceError::NotFound { entity: "job", id } if id == "job-42"
        );
    }

    #[test]
    fn unknown_code_falls_back_to_api_error() {
        let err = map_api_error(
            "submit_job",
            MediaApiError::Api {
                status: 500,
                code: Some("InternalError".to_string()),
                message: "boom".to_string(),
                target: None,
            },
        );
        assert_matches!(err, ServiceError::Api { status: 500, .. });
    }
}
