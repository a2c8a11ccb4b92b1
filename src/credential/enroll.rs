use inquire::{Confirm, Password, PasswordDisplayMode};

use super::CredentialError;
use crate::config::ProviderInfo;

/// Last resort when neither the environment nor the secret store has a key.
pub trait Enrollment {
    /// Returns a freshly entered key, or `None` when the user declines.
    fn enroll(&self, provider: &ProviderInfo) -> Result<Option<String>, CredentialError>;
}

/// Offers to store a key and reads it from the terminal.
pub struct InteractiveEnrollment;

impl Enrollment for InteractiveEnrollment {
    fn enroll(&self, provider: &ProviderInfo) -> Result<Option<String>, CredentialError> {
        let store = Confirm::new(&format!(
            "No {} API key found. Would you like to store one in the keyring?",
            provider.display_name
        ))
        .with_default(false)
        .prompt()
        .map_err(|e| CredentialError::Prompt(e.to_string()))?;

        if !store {
            return Ok(None);
        }

        let key = Password::new(&format!("Enter your {} API key:", provider.display_name))
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .map_err(|e| CredentialError::Prompt(e.to_string()))?;

        Ok(Some(key))
    }
}

/// Used when stdin is not a terminal or `--non-interactive` is set.
pub struct NonInteractiveEnrollment;

impl Enrollment for NonInteractiveEnrollment {
    fn enroll(&self, _provider: &ProviderInfo) -> Result<Option<String>, CredentialError> {
        Ok(None)
    }
}
