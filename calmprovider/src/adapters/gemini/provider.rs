//! Gemini provider implementation over transport and shared models.

use std::sync::Arc;

use async_stream::try_stream;
use futures_util::StreamExt;
use reqwest::Client;

use crate::{
    BoxedEventStream, ModelProvider, ModelRequest, ModelResponse, ProviderError, ProviderFuture,
    ProviderId, Role, SecureCredentialManager, StreamEvent,
};

use super::auth::resolve_gemini_auth;
use super::transport::{GeminiHttpTransport, GeminiTransport};
use super::types::{GeminiContent, GeminiGenerationConfig, GeminiRequest, GeminiRole};

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn GeminiTransport>,
}

impl GeminiProvider {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn GeminiTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    /// Provider backed by [`GeminiHttpTransport`] against the public endpoint.
    pub fn default_http_transport(credentials: Arc<SecureCredentialManager>, client: Client) -> Self {
        Self::new(credentials, Arc::new(GeminiHttpTransport::new(client)))
    }

    pub(crate) fn build_gemini_request(request: ModelRequest) -> GeminiRequest {
        let instructions = request.system_instructions().collect::<Vec<_>>();
        let system_instruction = if instructions.is_empty() {
            None
        } else {
            Some(instructions.join("\n\n"))
        };

        let contents = request
            .messages
            .into_iter()
            .filter_map(|message| match message.role {
                Role::System => None,
                Role::User => Some(GeminiContent::new(GeminiRole::User, message.content)),
                Role::Assistant => Some(GeminiContent::new(GeminiRole::Model, message.content)),
            })
            .collect();

        GeminiRequest {
            model: request.model,
            system_instruction,
            contents,
            generation_config: GeminiGenerationConfig {
                temperature: request.options.temperature,
                top_k: request.options.top_k,
                top_p: request.options.top_p,
                max_output_tokens: request.options.max_tokens,
            },
        }
    }
}

impl ModelProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let api_key = resolve_gemini_auth(&self.credentials)?;
            let gemini_request = Self::build_gemini_request(request);
            let response = self.transport.complete(gemini_request, api_key).await?;
            Ok(response.into_model_response())
        })
    }

    fn stream<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let api_key = resolve_gemini_auth(&self.credentials)?;
            let gemini_request = Self::build_gemini_request(request);
            let mut chunks = self.transport.stream(gemini_request, api_key).await?;

            let stream = try_stream! {
                while let Some(chunk) = chunks.next().await {
                    yield StreamEvent::from(chunk?);
                }
            };

            Ok(Box::pin(stream) as BoxedEventStream<'a>)
        })
    }
}
