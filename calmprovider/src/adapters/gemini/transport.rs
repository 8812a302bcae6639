//! Gemini transport trait and reqwest-based HTTP implementation.

use std::pin::Pin;

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{Client, Response};

use crate::{ProviderError, ProviderFuture, SecretString};

use super::serde_api::{
    GeminiApiResponse, build_api_request, extract_error_message, parse_finish_reason,
};
use super::types::{
    GeminiFinishReason, GeminiRequest, GeminiResponse, GeminiStreamChunk, GeminiUsage,
};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub type GeminiChunkStream<'a> =
    Pin<Box<dyn Stream<Item = Result<GeminiStreamChunk, ProviderError>> + Send + 'a>>;

pub trait GeminiTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: GeminiRequest,
        api_key: SecretString,
    ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>>;

    /// Resolves once the response headers arrive; an `Err` here means no text
    /// was produced.
    fn stream<'a>(
        &'a self,
        request: GeminiRequest,
        api_key: SecretString,
    ) -> ProviderFuture<'a, Result<GeminiChunkStream<'a>, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct GeminiHttpTransport {
    client: Client,
    base_url: String,
}

impl GeminiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.base_url.trim_end_matches('/'),
            model,
            method
        )
    }

    async fn send(
        &self,
        url: String,
        request: GeminiRequest,
        api_key: &SecretString,
    ) -> Result<Response, ProviderError> {
        let api_request = build_api_request(request)?;
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key.expose())
            .json(&api_request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ProviderError::timeout(err.to_string())
                } else {
                    ProviderError::transport(err.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        Ok(response)
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("Gemini request failed with status {status}"));

        ProviderError::from_status(status.as_u16(), message)
    }
}

impl GeminiTransport for GeminiHttpTransport {
    fn complete<'a>(
        &'a self,
        request: GeminiRequest,
        api_key: SecretString,
    ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>> {
        Box::pin(async move {
            let model = request.model.clone();
            let url = self.endpoint(&model, "generateContent");
            let response = self.send(url, request, &api_key).await?;

            let parsed: GeminiApiResponse = response
                .json()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))?;

            parsed.into_response(model)
        })
    }

    fn stream<'a>(
        &'a self,
        request: GeminiRequest,
        api_key: SecretString,
    ) -> ProviderFuture<'a, Result<GeminiChunkStream<'a>, ProviderError>> {
        Box::pin(async move {
            let requested_model = request.model.clone();
            let url = format!(
                "{}?alt=sse",
                self.endpoint(&requested_model, "streamGenerateContent")
            );
            let response = self.send(url, request, &api_key).await?;

            let stream = try_stream! {
                let mut chunks = response.bytes_stream();
                let mut buffer = Vec::<u8>::new();
                let mut state = StreamState::new(requested_model);

                while let Some(item) = chunks.next().await {
                    let bytes = item.map_err(|err| ProviderError::transport(err.to_string()))?;
                    buffer.extend_from_slice(&bytes);

                    for payload in drain_data_lines(&mut buffer)? {
                        if let Some(delta) = state.absorb(&payload)? {
                            yield GeminiStreamChunk::TextDelta(delta);
                        }
                    }
                }

                buffer.push(b'\n');
                for payload in drain_data_lines(&mut buffer)? {
                    if let Some(delta) = state.absorb(&payload)? {
                        yield GeminiStreamChunk::TextDelta(delta);
                    }
                }

                yield GeminiStreamChunk::ResponseComplete(state.finish());
            };

            Ok(Box::pin(stream) as GeminiChunkStream<'a>)
        })
    }
}

/// Removes every complete line from `buffer` and returns the payloads of its
/// `data:` lines. An incomplete trailing line stays buffered, so multibyte
/// characters split across network reads are decoded intact.
pub(crate) fn drain_data_lines(buffer: &mut Vec<u8>) -> Result<Vec<String>, ProviderError> {
    let mut payloads = Vec::new();

    while let Some(newline_index) = buffer.iter().position(|byte| *byte == b'\n') {
        let line = buffer.drain(..=newline_index).collect::<Vec<_>>();
        let line = std::str::from_utf8(&line)
            .map_err(|err| ProviderError::transport(err.to_string()))?;
        let line = line.trim();

        let Some(payload) = line.strip_prefix("data:") else {
            continue;
        };

        let payload = payload.trim();
        if !payload.is_empty() {
            payloads.push(payload.to_string());
        }
    }

    Ok(payloads)
}

/// Running totals for one `streamGenerateContent` response.
#[derive(Debug)]
pub(crate) struct StreamState {
    model: String,
    text: String,
    finish_reason: GeminiFinishReason,
    usage: GeminiUsage,
}

impl StreamState {
    pub(crate) fn new(model: String) -> Self {
        Self {
            model,
            text: String::new(),
            finish_reason: GeminiFinishReason::Other,
            usage: GeminiUsage::default(),
        }
    }

    /// Folds one SSE payload into the totals and returns its new text, if any.
    pub(crate) fn absorb(&mut self, payload: &str) -> Result<Option<String>, ProviderError> {
        let parsed: GeminiApiResponse = serde_json::from_str(payload)
            .map_err(|err| ProviderError::transport(err.to_string()))?;

        if let Some(reason) = parsed.block_reason() {
            return Err(ProviderError::blocked(format!(
                "Gemini blocked the prompt: {reason}"
            )));
        }

        if let Some(reason) = parsed.finish_reason() {
            self.finish_reason = parse_finish_reason(Some(reason));
        }

        if parsed.usage_metadata.is_some() {
            self.usage = parsed.usage();
        }

        if let Some(version) = &parsed.model_version {
            self.model = version.clone();
        }

        let delta = parsed.text();
        if delta.is_empty() {
            return Ok(None);
        }

        self.text.push_str(&delta);
        Ok(Some(delta))
    }

    pub(crate) fn finish(self) -> GeminiResponse {
        GeminiResponse {
            model: self.model,
            text: self.text,
            finish_reason: self.finish_reason,
            usage: self.usage,
        }
    }
}
