use keyring::Entry;

use super::CredentialError;

/// Service name under which keys are filed in the OS secret store.
pub const KEYRING_SERVICE: &str = "ai_commit_gen";

/// Key-value secret vault keyed by account name.
pub trait SecretStore {
    /// Returns `Ok(None)` when there is no entry for the account.
    fn get(&self, account: &str) -> Result<Option<String>, CredentialError>;

    fn set(&self, account: &str, secret: &str) -> Result<(), CredentialError>;
}

/// Secret store backed by the platform keyring.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        KeyringStore {
            service: KEYRING_SERVICE.to_string(),
        }
    }

    fn entry(&self, account: &str) -> Result<Entry, CredentialError> {
        Entry::new(&self.service, account).map_err(|e| CredentialError::Store(e.to_string()))
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeyringStore {
    fn get(&self, account: &str) -> Result<Option<String>, CredentialError> {
        match self.entry(account)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CredentialError::Store(e.to_string())),
        }
    }

    fn set(&self, account: &str, secret: &str) -> Result<(), CredentialError> {
        self.entry(account)?
            .set_password(secret)
            .map_err(|e| CredentialError::Store(e.to_string()))
    }
}
