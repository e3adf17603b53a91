//! Asset handles and account-name shape validation.
//!
//! An asset is a content object (input or output) bound to exactly one
//! storage account. Assets created locally as task outputs are *pending*:
//! they carry a client-generated id until the service assigns the real
//! one at submission. The storage account name on an asset is fixed at
//! creation and never changes afterwards.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EntityId;

/// Upper bound for a storage account name accepted client-side.
///
/// Deliberately generous: the client only checks name *shape*; whether
/// the account actually exists is authoritative on the service and
/// surfaces as a structured submission error.
pub const MAX_ACCOUNT_NAME_LEN: usize = 64;

/// Encryption applied to an asset's content at rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EncryptionOption {
    /// No encryption.
    None,
    /// Content is encrypted in storage.
    StorageEncrypted,
    /// Content is protected with common encryption.
    CommonEncryptionProtected,
}

/// A content object bound to one storage account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Service-assigned id, or a client-generated placeholder while the
    /// asset is pending.
    pub id: EntityId,
    /// Human-readable asset name.
    pub name: String,
    /// Name of the storage account holding this asset's content.
    /// Fixed at creation.
    pub storage_account_name: String,
    /// Encryption applied to the asset's content.
    pub encryption: EncryptionOption,
}

impl Asset {
    /// Create a pending output asset with a client-generated id.
    ///
    /// The storage account name is shape-checked but *not* resolved
    /// against any registry; the service is the authority on existence.
    pub fn pending(
        name: &str,
        storage_account_name: &str,
        encryption: EncryptionOption,
    ) -> Result<Self, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Asset name must not be empty".to_string(),
            ));
        }
        validate_account_name_shape(storage_account_name)?;

        Ok(Self {
            id: format!("local:{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            storage_account_name: storage_account_name.to_string(),
            encryption,
        })
    }
}

/// Validate the shape of a storage account name: non-empty, no
/// whitespace, and within [`MAX_ACCOUNT_NAME_LEN`].
pub fn validate_account_name_shape(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Storage account name must not be empty".to_string(),
        ));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "Storage account name '{name}' must not contain whitespace"
        )));
    }
    if name.len() > MAX_ACCOUNT_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Storage account name too long: {} chars (max {MAX_ACCOUNT_NAME_LEN})",
            name.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
