//! Storage accounts and the read-only account registry.
//!
//! A media account is associated with one or more storage accounts, of
//! which at most one is the default target for new output assets. The
//! registry is loaded once from the service at client start-up and is
//! immutable afterwards, so it is safe to share across concurrent job
//! submissions without locking.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A storage account known to the remote media service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageAccount {
    /// Unique account name.
    pub name: String,
    /// Whether this account is the default target for output assets.
    pub is_default: bool,
}

/// Read-only collection of the storage accounts attached to a media
/// account.
///
/// Construction validates that names are unique and that at most one
/// account is marked default. A registry *without* a default account is
/// allowed (the listing comes from the service and is not ours to fix);
/// the problem surfaces on [`default_account`](Self::default_account).
#[derive(Debug, Clone)]
pub struct AccountRegistry {
    accounts: Vec<StorageAccount>,
}

impl AccountRegistry {
    /// Build a registry from a service listing.
    ///
    /// Fails with [`CoreError::Configuration`] if two accounts share a
    /// name or more than one account is marked default.
    pub fn new(accounts: Vec<StorageAccount>) -> Result<Self, CoreError> {
        for (i, account) in accounts.iter().enumerate() {
            if accounts[..i].iter().any(|a| a.name == account.name) {
                return Err(CoreError::Configuration(format!(
                    "Duplicate storage account name '{}'",
                    account.name
                )));
            }
        }

        let defaults = accounts.iter().filter(|a| a.is_default).count();
        if defaults > 1 {
            return Err(CoreError::Configuration(format!(
                "Expected at most one default storage account, found {defaults}"
            )));
        }

        Ok(Self { accounts })
    }

    /// All known storage accounts, in load order.
    pub fn accounts(&self) -> &[StorageAccount] {
        &self.accounts
    }

    /// The default storage account.
    ///
    /// Fails with [`CoreError::Configuration`] when no account is marked
    /// default. Stable: repeated calls return the same account.
    pub fn default_account(&self) -> Result<&StorageAccount, CoreError> {
        self.accounts
            .iter()
            .find(|a| a.is_default)
            .ok_or_else(|| {
                CoreError::Configuration(
                    "No default storage account is configured for this media account".to_string(),
                )
            })
    }

    /// Look up an account by name.
    pub fn find_by_name(&self, name: &str) -> Option<&StorageAccount> {
        self.accounts.iter().find(|a| a.name == name)
    }

    /// All non-default accounts, in load order.
    ///
    /// No selection policy is applied here; callers choose which
    /// non-default account to target.
    pub fn non_default_accounts(&self) -> impl Iterator<Item = &StorageAccount> {
        self.accounts.iter().filter(|a| !a.is_default)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
