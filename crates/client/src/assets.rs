//! Asset creation against the remote service.

use std::path::Path;
use std::sync::Arc;

use mediaq_core::account::StorageAccount;
use mediaq_core::asset::{Asset, EncryptionOption};

use crate::resources::NewAssetRequest;
use crate::service::{MediaService, ServiceError};

/// Creates content assets bound to a storage account.
///
/// The returned [`Asset`] is a local handle; the asset itself lives on
/// the service. Content upload is out of scope for this client.
pub struct AssetManager {
    service: Arc<dyn MediaService>,
}

impl AssetManager {
    pub fn new(service: Arc<dyn MediaService>) -> Self {
        Self { service }
    }

    /// Register an asset for `source_file` in `account`.
    ///
    /// The asset name is derived from the file name. Fails with
    /// [`ServiceError`] on transport or service errors.
    pub async fn create_asset(
        &self,
        source_file: &Path,
        account: &StorageAccount,
        encryption: EncryptionOption,
    ) -> Result<Asset, ServiceError> {
        let name = source_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "asset".to_string());

        let asset = self
            .service
            .create_asset(NewAssetRequest {
                name,
                storage_account_name: account.name.clone(),
                encryption,
            })
            .await?;

        tracing::info!(
            asset_id = %asset.id,
            account = %asset.storage_account_name,
            "Asset created",
        );
        Ok(asset)
    }
}
