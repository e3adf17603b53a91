//! Wire types for the consumed REST surface.
//!
//! Request payloads, the structured error envelope, and conversions from
//! the in-memory drafts in `mediaq-core`. Responses that match the domain
//! snapshots exactly ([`mediaq_core::job::Job`], [`mediaq_core::asset::Asset`],
//! [`mediaq_core::task::MediaProcessor`]) deserialize straight into them.

use serde::{Deserialize, Serialize};

use mediaq_core::asset::EncryptionOption;
use mediaq_core::job::JobDraft;
use mediaq_core::task::TaskOptions;
use mediaq_core::types::EntityId;

/// Error code the service returns when a job references a storage
/// account it does not know. Structured replacement for the legacy
/// "Cannot find the storage account" message-substring contract.
pub const CODE_STORAGE_ACCOUNT_NOT_FOUND: &str = "StorageAccountNotFound";

/// Error code for a missing job resource.
pub const CODE_JOB_NOT_FOUND: &str = "JobNotFound";

/// Storage account entry from `GET /storageaccounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountResource {
    pub name: String,
    pub is_default: bool,
}

impl From<StorageAccountResource> for mediaq_core::account::StorageAccount {
    fn from(resource: StorageAccountResource) -> Self {
        Self {
            name: resource.name,
            is_default: resource.is_default,
        }
    }
}

/// Payload for `POST /assets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssetRequest {
    /// Asset name (typically derived from the source file).
    pub name: String,
    /// Storage account that will hold the asset's content.
    pub storage_account_name: String,
    /// Encryption to apply at rest.
    pub encryption: EncryptionOption,
}

/// Output asset requested as part of a task submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputAssetSpec {
    pub name: String,
    pub storage_account_name: String,
    pub encryption: EncryptionOption,
}

/// One task within a job submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    pub name: String,
    pub processor_id: EntityId,
    pub preset: String,
    pub options: TaskOptions,
    /// Input asset ids in binding order.
    pub input_asset_ids: Vec<EntityId>,
    /// Output assets to create, in binding order.
    pub output_assets: Vec<OutputAssetSpec>,
}

/// Payload for `POST /jobs`: the whole job with embedded tasks/assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSubmission {
    pub name: String,
    pub tasks: Vec<TaskSubmission>,
}

impl JobSubmission {
    /// Serialize a validated draft into its submission payload.
    pub fn from_draft(draft: &JobDraft) -> Self {
        let tasks = draft
            .tasks()
            .iter()
            .map(|task| TaskSubmission {
                name: task.name.clone(),
                processor_id: task.processor_id.clone(),
                preset: task.preset.clone(),
                options: task.options,
                input_asset_ids: task.input_assets().iter().map(|a| a.id.clone()).collect(),
                output_assets: task
                    .output_assets()
                    .iter()
                    .map(|a| OutputAssetSpec {
                        name: a.name.clone(),
                        storage_account_name: a.storage_account_name.clone(),
                        encryption: a.encryption,
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: draft.name.clone(),
            tasks,
        }
    }
}

/// Response from `POST /jobs/{id}/template`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResource {
    pub id: EntityId,
    pub name: String,
}

/// Structured error envelope returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

/// The service's structured error detail.
///
/// `code` carries the machine-readable error kind; `target` names the
/// offending resource where applicable (e.g. the storage account name).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorDetail {
    pub code: Option<String>,
    pub message: String,
    pub target: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
