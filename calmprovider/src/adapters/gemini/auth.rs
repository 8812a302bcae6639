//! Gemini credential helpers.

use crate::{ProviderError, ProviderId, SecretString, SecureCredentialManager};

impl SecureCredentialManager {
    /// Stores the Gemini API key sent in the `x-goog-api-key` header.
    pub fn set_gemini_api_key(&self, api_key: impl Into<String>) -> Result<(), ProviderError> {
        self.set_api_key(ProviderId::Gemini, api_key)
    }
}

pub(crate) fn resolve_gemini_auth(
    credentials: &SecureCredentialManager,
) -> Result<SecretString, ProviderError> {
    credentials
        .api_key(ProviderId::Gemini)?
        .ok_or_else(|| ProviderError::authentication("no Gemini API key configured"))
}
