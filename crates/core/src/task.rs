//! Task description: one processing step within a job.
//!
//! A [`TaskDraft`] is built up while drafting a job (inputs added, output
//! assets created fresh); a [`Task`] is the immutable snapshot of a task
//! as reported by the service after submission.

use serde::{Deserialize, Serialize};

use crate::asset::{Asset, EncryptionOption};
use crate::error::CoreError;
use crate::types::EntityId;

/// A media processor available on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaProcessor {
    /// Service-assigned processor id.
    pub id: EntityId,
    /// Processor name, used for selection (e.g. an encoder name).
    pub name: String,
    /// Processor version string.
    pub version: String,
}

/// Per-task submission options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskOptions {
    /// No special handling.
    None,
    /// The task's preset configuration is encrypted in transit and at rest.
    ProtectedConfiguration,
}

/// A task being assembled as part of an unsubmitted job draft.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    /// Task name.
    pub name: String,
    /// Id of the processor that will run this task.
    pub processor_id: EntityId,
    /// Processor preset configuration (opaque to this client).
    pub preset: String,
    /// Submission options.
    pub options: TaskOptions,
    input_assets: Vec<Asset>,
    output_assets: Vec<Asset>,
}

impl TaskDraft {
    pub(crate) fn new(
        name: &str,
        processor: &MediaProcessor,
        preset: &str,
        options: TaskOptions,
    ) -> Self {
        Self {
            name: name.to_string(),
            processor_id: processor.id.clone(),
            preset: preset.to_string(),
            options,
            input_assets: Vec::new(),
            output_assets: Vec::new(),
        }
    }

    /// Bind an existing asset as the next input of this task.
    pub fn add_input(&mut self, asset: Asset) -> &mut Self {
        self.input_assets.push(asset);
        self
    }

    /// Create a fresh output asset targeting `storage_account_name`.
    ///
    /// The account name gets a client-side shape check only; existence is
    /// authoritative on the service. The returned pending asset's account
    /// binding is fixed at creation and never changes after submission.
    pub fn add_output(
        &mut self,
        name: &str,
        storage_account_name: &str,
        encryption: EncryptionOption,
    ) -> Result<Asset, CoreError> {
        let asset = Asset::pending(name, storage_account_name, encryption)?;
        self.output_assets.push(asset.clone());
        Ok(asset)
    }

    /// Append an already-validated pending output. Used by template
    /// replay, where the account binding was validated when the source
    /// job was drafted.
    pub(crate) fn push_output(&mut self, asset: Asset) {
        self.output_assets.push(asset);
    }

    /// Inputs bound so far, in order.
    pub fn input_assets(&self) -> &[Asset] {
        &self.input_assets
    }

    /// Outputs created so far, in order.
    pub fn output_assets(&self) -> &[Asset] {
        &self.output_assets
    }
}

/// Immutable snapshot of a task as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task name.
    pub name: String,
    /// Id of the processor running this task.
    pub processor_id: EntityId,
    /// Processor preset configuration.
    pub preset: String,
    /// Submission options.
    pub options: TaskOptions,
    /// Ids of the input assets, in submission order.
    pub input_asset_ids: Vec<EntityId>,
    /// Output assets with their service-assigned ids and authoritative
    /// storage account bindings.
    pub output_assets: Vec<Asset>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
