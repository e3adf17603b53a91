//! REST API client for the media service HTTP endpoints.
//!
//! Wraps the consumed surface (storage accounts, processors, asset
//! creation, job submission/fetch/cancel, templates) using [`reqwest`].
//! Error payloads are decoded into the structured envelope from
//! [`crate::resources`]; nothing here matches on message text.

use serde::Serialize;

use mediaq_core::asset::Asset;
use mediaq_core::job::Job;
use mediaq_core::task::MediaProcessor;

use crate::resources::{
    ApiErrorBody, JobSubmission, NewAssetRequest, StorageAccountResource, TemplateResource,
};

/// HTTP client for one media service endpoint.
pub struct MediaApi {
    client: reqwest::Client,
    api_url: String,
}

/// Errors from the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum MediaApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Media service error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code, when the envelope carried one.
        code: Option<String>,
        /// Human-readable message (for logs only, never matched on).
        message: String,
        /// Offending resource named by the service, when present.
        target: Option<String>,
    },
}

impl MediaApi {
    /// Create a new API client with its own connection pool.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:8080/api`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (one pooled client per process is acquired at start-up and shared).
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// Base HTTP API URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// List the storage accounts attached to the media account.
    ///
    /// Sends `GET /storageaccounts`.
    pub async fn list_storage_accounts(
        &self,
    ) -> Result<Vec<StorageAccountResource>, MediaApiError> {
        let response = self
            .client
            .get(format!("{}/storageaccounts", self.api_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// List the media processors available on the service.
    ///
    /// Sends `GET /processors`.
    pub async fn list_processors(&self) -> Result<Vec<MediaProcessor>, MediaApiError> {
        let response = self
            .client
            .get(format!("{}/processors", self.api_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Register a new asset.
    ///
    /// Sends `POST /assets`; the response carries the service-assigned
    /// id and the accepted storage account.
    pub async fn create_asset(&self, request: &NewAssetRequest) -> Result<Asset, MediaApiError> {
        let response = self
            .client
            .post(format!("{}/assets", self.api_url))
            .json(request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Submit a job with embedded tasks and asset bindings.
    ///
    /// Sends `POST /jobs`. On acceptance the response is the queued job
    /// resource with server-assigned ids.
    pub async fn submit_job(&self, submission: &JobSubmission) -> Result<Job, MediaApiError> {
        let response = self
            .client
            .post(format!("{}/jobs", self.api_url))
            .json(submission)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Fetch the authoritative snapshot of a job.
    ///
    /// Sends `GET /jobs/{id}`: current state, task list, and output
    /// asset bindings.
    pub async fn get_job(&self, job_id: &str) -> Result<Job, MediaApiError> {
        let response = self
            .client
            .get(format!("{}/jobs/{}", self.api_url, job_id))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Request cancellation of a queued or running job.
    ///
    /// Sends `POST /jobs/{id}/cancel`.
    pub async fn cancel_job(&self, job_id: &str) -> Result<(), MediaApiError> {
        let response = self
            .client
            .post(format!("{}/jobs/{}/cancel", self.api_url, job_id))
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Save a job's shape as a reusable template.
    ///
    /// Sends `POST /jobs/{id}/template`.
    pub async fn save_template(
        &self,
        job_id: &str,
        name: &str,
    ) -> Result<TemplateResource, MediaApiError> {
        #[derive(Serialize)]
        struct SaveTemplateRequest<'a> {
            name: &'a str,
        }

        let response = self
            .client
            .post(format!("{}/jobs/{}/template", self.api_url, job_id))
            .json(&SaveTemplateRequest { name })
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. On failure, decode
    /// the structured error envelope (falling back to the raw body when
    /// the envelope does not parse).
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, MediaApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(envelope) => MediaApiError::Api {
                    status: status.as_u16(),
                    code: envelope.error.code,
                    message: envelope.error.message,
                    target: envelope.error.target,
                },
                Err(_) => MediaApiError::Api {
                    status: status.as_u16(),
                    code: None,
                    message: body,
                    target: None,
                },
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, MediaApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), MediaApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
