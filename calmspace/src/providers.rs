//! Provider construction from a [`CompanionConfig`].

use std::sync::Arc;

use reqwest::Client;

use crate::{CompanionConfig, ModelProvider, ProviderError, ProviderId, SecureCredentialManager};

/// Builds the HTTP client, credential store, and Gemini provider.
///
/// A missing API key still yields a provider; its calls fail with an
/// authentication error, which the conversation routes to the fallback.
pub fn build_gemini_provider(
    config: &CompanionConfig,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    let credentials = Arc::new(SecureCredentialManager::new());
    if let Some(api_key) = config.api_key.as_deref() {
        credentials.set_api_key(ProviderId::Gemini, api_key)?;
    }

    let http = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))?;

    build_gemini_with_client(credentials, http, config.base_url.as_deref())
}

#[cfg(feature = "provider-gemini")]
fn build_gemini_with_client(
    credentials: Arc<SecureCredentialManager>,
    http: Client,
    base_url: Option<&str>,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    use calmprovider::adapters::gemini::{GeminiHttpTransport, GeminiProvider};

    let mut transport = GeminiHttpTransport::new(http);
    if let Some(base_url) = base_url {
        transport = transport.with_base_url(base_url);
    }

    Ok(Arc::new(GeminiProvider::new(credentials, Arc::new(transport))))
}

#[cfg(not(feature = "provider-gemini"))]
fn build_gemini_with_client(
    _credentials: Arc<SecureCredentialManager>,
    _http: Client,
    _base_url: Option<&str>,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-gemini feature is not enabled on calmspace",
    ))
}
