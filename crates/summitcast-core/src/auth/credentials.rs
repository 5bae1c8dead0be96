use anyhow::{Context, Result};
use keyring::Entry;

use crate::config::API_KEY_ENV;

const SERVICE_NAME: &str = "summitcast";

/// Keychain account the completion API key is stored under.
const API_KEY_ACCOUNT: &str = "completion-api-key";

pub struct CredentialStore;

impl CredentialStore {
    /// Store the completion API key in the OS keychain
    pub fn store_api_key(api_key: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ACCOUNT)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(api_key)
            .context("Failed to store API key in keychain")?;
        Ok(())
    }

    /// Retrieve the completion API key from the OS keychain
    pub fn get_api_key() -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ACCOUNT)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve API key from keychain")
    }

    /// Delete the stored API key
    pub fn delete_api_key() -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ACCOUNT)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete API key from keychain")?;
        Ok(())
    }

    /// API key from the environment, falling back to the keychain.
    pub fn resolve_api_key() -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| Self::get_api_key().ok())
    }
}
