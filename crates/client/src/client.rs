//! Process-wide client facade for the media service.
//!
//! [`MediaClient::connect`] is called once at start-up: it builds the
//! REST client and loads the storage-account registry, which is
//! immutable afterwards. The returned `Arc` can be cheaply cloned into
//! independent callers; all methods take `&self` and submissions share
//! no mutable state, so concurrent job lifecycles are safe.

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use mediaq_core::account::{AccountRegistry, StorageAccount};
use mediaq_core::asset::{Asset, EncryptionOption};
use mediaq_core::error::CoreError;
use mediaq_core::job::{Job, JobDraft, JobState};
use mediaq_core::task::MediaProcessor;
use mediaq_core::template::{JobTemplate, TemplateError};

use crate::api::MediaApi;
use crate::assets::AssetManager;
use crate::config::ClientConfig;
use crate::poller::{self, PollConfig, PollError};
use crate::service::{MediaService, ServiceError};
use crate::submit::{self, SubmitError};
use crate::templates::{self, TemplateEngineError};

/// Errors from establishing the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The fetched account listing is unusable (duplicate names,
    /// multiple defaults).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The initial account fetch failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Shared handle to the media service and its account registry.
pub struct MediaClient {
    service: Arc<dyn MediaService>,
    registry: Arc<AccountRegistry>,
    assets: AssetManager,
    poll: PollConfig,
}

impl MediaClient {
    /// Connect to the configured endpoint and load the storage-account
    /// registry. Acquires the process's pooled HTTP client.
    pub async fn connect(config: ClientConfig) -> Result<Arc<Self>, ClientError> {
        let api = MediaApi::new(config.api_url.clone());
        Self::with_service(Arc::new(api), config.poll).await
    }

    /// Build a client over an explicit [`MediaService`] implementation.
    ///
    /// Used by tests with an in-memory service; `connect` delegates here.
    pub async fn with_service(
        service: Arc<dyn MediaService>,
        poll: PollConfig,
    ) -> Result<Arc<Self>, ClientError> {
        let accounts = service.storage_accounts().await?;
        let registry = Arc::new(AccountRegistry::new(accounts)?);

        tracing::info!(
            accounts = registry.accounts().len(),
            "Media client connected; storage accounts loaded",
        );

        Ok(Arc::new(Self {
            assets: AssetManager::new(Arc::clone(&service)),
            service,
            registry,
            poll,
        }))
    }

    /// The read-only storage-account registry loaded at connect time.
    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    /// Start a new in-memory job draft. Not visible to the service
    /// until submitted.
    pub fn create_job(&self, name: &str) -> JobDraft {
        JobDraft::new(name)
    }

    /// Register a content asset in `account`.
    pub async fn create_asset(
        &self,
        source_file: &Path,
        account: &StorageAccount,
        encryption: EncryptionOption,
    ) -> Result<Asset, ServiceError> {
        self.assets
            .create_asset(source_file, account, encryption)
            .await
    }

    /// List the media processors available on the service.
    pub async fn processors(&self) -> Result<Vec<MediaProcessor>, ServiceError> {
        self.service.processors().await
    }

    /// Select a processor by name.
    pub async fn processor_by_name(&self, name: &str) -> Result<MediaProcessor, ServiceError> {
        self.service
            .processors()
            .await?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or(ServiceError::NotFound {
                entity: "processor",
                id: name.to_string(),
            })
    }

    /// Validate and submit a draft; see [`submit::submit_job`].
    pub async fn submit_job(&self, draft: JobDraft) -> Result<Job, SubmitError> {
        submit::submit_job(self.service.as_ref(), draft).await
    }

    /// Re-fetch the authoritative snapshot of a submitted job.
    pub async fn get_job(&self, job_id: &str) -> Result<Job, ServiceError> {
        self.service.get_job(job_id).await
    }

    /// Request cancellation of a queued or running job.
    pub async fn cancel_job(&self, job_id: &str) -> Result<(), ServiceError> {
        self.service.cancel_job(job_id).await?;
        tracing::info!(job_id, "Job cancellation requested");
        Ok(())
    }

    /// Block the calling task until the job reaches `target_state`, then
    /// run `verifier` on the final snapshot.
    pub async fn wait_for_job<V>(
        &self,
        job_id: &str,
        target_state: JobState,
        verifier: V,
    ) -> Result<Job, PollError>
    where
        V: Fn(&Job) -> bool,
    {
        poller::wait_for_job(self.service.as_ref(), job_id, target_state, &self.poll, verifier)
            .await
    }

    /// Like [`wait_for_job`](Self::wait_for_job), abandonable via
    /// `cancel` without affecting the remote job.
    pub async fn wait_for_job_cancellable<V>(
        &self,
        job_id: &str,
        target_state: JobState,
        cancel: &CancellationToken,
        verifier: V,
    ) -> Result<Job, PollError>
    where
        V: Fn(&Job) -> bool,
    {
        poller::wait_for_job_cancellable(
            self.service.as_ref(),
            job_id,
            target_state,
            &self.poll,
            cancel,
            verifier,
        )
        .await
    }

    /// Save a finished job's shape as a reusable template.
    pub async fn save_as_template(
        &self,
        job: &Job,
        name: &str,
    ) -> Result<JobTemplate, TemplateEngineError> {
        templates::save_as_template(self.service.as_ref(), job, name).await
    }

    /// Instantiate an unsubmitted draft from a template.
    pub fn create_job_from_template(
        &self,
        name: &str,
        template: &JobTemplate,
        inputs: &[Asset],
    ) -> Result<JobDraft, TemplateError> {
        templates::create_job_from_template(name, template, inputs)
    }
}
