//! API key resolution.
//!
//! Keys are looked up in the provider's environment variable, then in the secret store, and
//! finally obtained through an [`Enrollment`] strategy which may store a freshly entered key.

mod enroll;
mod store;

pub use enroll::{Enrollment, InteractiveEnrollment, NonInteractiveEnrollment};
pub use store::{KeyringStore, SecretStore};

use thiserror::Error;
use tracing::debug;

use crate::config::ProviderInfo;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("No {provider} API key provided. Set {env_key} or store a key in the keyring.")]
    MissingCredential {
        provider: &'static str,
        env_key: &'static str,
    },

    #[error("secret store error: {0}")]
    Store(String),

    #[error("prompt failed: {0}")]
    Prompt(String),
}

type EnvLookup = fn(&str) -> Option<String>;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Trims a candidate secret; blank values count as absent.
fn usable(secret: Option<String>) -> Option<String> {
    secret
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub struct CredentialResolver {
    store: Box<dyn SecretStore>,
    enrollment: Box<dyn Enrollment>,
    env_lookup: EnvLookup,
}

impl CredentialResolver {
    pub fn new(store: Box<dyn SecretStore>, enrollment: Box<dyn Enrollment>) -> Self {
        CredentialResolver {
            store,
            enrollment,
            env_lookup: process_env,
        }
    }

    /// Keyring-backed resolver, prompting only when `interactive` is set.
    pub fn system(interactive: bool) -> Self {
        let enrollment: Box<dyn Enrollment> = if interactive {
            Box::new(InteractiveEnrollment)
        } else {
            Box::new(NonInteractiveEnrollment)
        };
        Self::new(Box::new(KeyringStore::new()), enrollment)
    }

    #[cfg(test)]
    pub fn with_env_lookup(mut self, env_lookup: EnvLookup) -> Self {
        self.env_lookup = env_lookup;
        self
    }

    pub fn resolve_or_enroll(&self, provider: &ProviderInfo) -> Result<String, CredentialError> {
        if let Some(key) = usable((self.env_lookup)(provider.env_key)) {
            debug!("using {} API key from {}", provider.display_name, provider.env_key);
            return Ok(key);
        }

        let account = provider.store_account();
        let stored = match self.store.get(&account) {
            Ok(secret) => secret,
            Err(e) => {
                debug!("could not read {} from the secret store: {}", account, e);
                None
            }
        };
        if let Some(key) = usable(stored) {
            debug!("using {} API key from the secret store", provider.display_name);
            return Ok(key);
        }

        let missing = CredentialError::MissingCredential {
            provider: provider.display_name,
            env_key: provider.env_key,
        };

        let Some(key) = usable(self.enrollment.enroll(provider)?) else {
            return Err(missing);
        };

        self.store.set(&account, &key)?;
        debug!("stored {} API key in the secret store", provider.display_name);
        Ok(key)
    }
}
