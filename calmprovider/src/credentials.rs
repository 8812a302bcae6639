//! In-memory API key storage with redacted debug output.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::{ProviderError, ProviderId};

#[derive(Clone, PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8 and the string is never read again.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

#[derive(Default)]
pub struct SecureCredentialManager {
    api_keys: Mutex<HashMap<ProviderId, SecretString>>,
}

impl SecureCredentialManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_api_key(
        &self,
        provider: ProviderId,
        api_key: impl Into<String>,
    ) -> Result<(), ProviderError> {
        let api_key = SecretString::new(api_key.into().trim());
        if api_key.is_empty() {
            return Err(ProviderError::authentication("api key must not be empty"));
        }

        self.api_keys_guard()?.insert(provider, api_key);
        Ok(())
    }

    pub fn has_credentials(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        Ok(self.api_keys_guard()?.contains_key(&provider))
    }

    pub fn api_key(&self, provider: ProviderId) -> Result<Option<SecretString>, ProviderError> {
        Ok(self.api_keys_guard()?.get(&provider).cloned())
    }

    pub fn with_api_key<R>(
        &self,
        provider: ProviderId,
        f: impl FnOnce(&str) -> R,
    ) -> Result<Option<R>, ProviderError> {
        Ok(self
            .api_keys_guard()?
            .get(&provider)
            .map(|secret| f(secret.expose())))
    }

    pub fn clear(&self, provider: ProviderId) -> Result<bool, ProviderError> {
        Ok(self.api_keys_guard()?.remove(&provider).is_some())
    }

    fn api_keys_guard(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<ProviderId, SecretString>>, ProviderError> {
        self.api_keys
            .lock()
            .map_err(|_| ProviderError::other("credential manager lock poisoned"))
    }
}

impl std::fmt::Debug for SecureCredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureCredentialManager")
            .finish_non_exhaustive()
    }
}
