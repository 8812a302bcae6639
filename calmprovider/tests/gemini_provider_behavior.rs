#![cfg(feature = "provider-gemini")]

use std::sync::{Arc, Mutex};

use calmprovider::adapters::gemini::{
    GeminiChunkStream, GeminiFinishReason, GeminiProvider, GeminiRequest, GeminiResponse,
    GeminiRole, GeminiStreamChunk, GeminiTransport, GeminiUsage,
};
use calmprovider::{
    GenerationOptions, Message, ModelProvider, ModelRequest, ProviderError, ProviderErrorKind,
    ProviderFuture, ProviderId, Role, SecretString, SecureCredentialManager, StopReason,
    StreamEvent,
};
use futures_util::{StreamExt, stream};

#[derive(Debug, Default)]
struct FakeTransport {
    captured_key: Mutex<Option<String>>,
    captured_request: Mutex<Option<GeminiRequest>>,
}

impl FakeTransport {
    fn capture(&self, request: GeminiRequest, api_key: SecretString) {
        *self.captured_request.lock().expect("request lock") = Some(request);
        *self.captured_key.lock().expect("key lock") = Some(api_key.expose().to_string());
    }

    fn response(text: &str) -> GeminiResponse {
        GeminiResponse {
            model: "gemini-2.0-flash-exp".to_string(),
            text: text.to_string(),
            finish_reason: GeminiFinishReason::Stop,
            usage: GeminiUsage {
                prompt_tokens: 11,
                candidates_tokens: 5,
                total_tokens: 16,
            },
        }
    }
}

impl GeminiTransport for FakeTransport {
    fn complete<'a>(
        &'a self,
        request: GeminiRequest,
        api_key: SecretString,
    ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>> {
        Box::pin(async move {
            self.capture(request, api_key);
            Ok(Self::response("You are not alone."))
        })
    }

    fn stream<'a>(
        &'a self,
        request: GeminiRequest,
        api_key: SecretString,
    ) -> ProviderFuture<'a, Result<GeminiChunkStream<'a>, ProviderError>> {
        Box::pin(async move {
            self.capture(request, api_key);
            let chunks = stream::iter(vec![
                Ok(GeminiStreamChunk::TextDelta("You are ".to_string())),
                Ok(GeminiStreamChunk::TextDelta("not alone.".to_string())),
                Ok(GeminiStreamChunk::ResponseComplete(Self::response(
                    "You are not alone.",
                ))),
            ]);
            Ok(Box::pin(chunks) as GeminiChunkStream<'a>)
        })
    }
}

fn provider_with_key(transport: Arc<FakeTransport>) -> GeminiProvider {
    let credentials = Arc::new(SecureCredentialManager::new());
    credentials
        .set_gemini_api_key("  AIza-test-key ")
        .expect("key should set");
    GeminiProvider::new(credentials, transport)
}

fn request() -> ModelRequest {
    ModelRequest::new(
        "gemini-2.0-flash-exp",
        vec![
            Message::new(Role::System, "You are CalmSpace."),
            Message::new(Role::User, "I feel lonely"),
        ],
    )
    .with_options(GenerationOptions::conversation_defaults())
}

#[tokio::test]
async fn complete_maps_gemini_response_to_provider_response() {
    let transport = Arc::new(FakeTransport::default());
    let provider = provider_with_key(transport.clone());

    let response = provider
        .complete(request())
        .await
        .expect("completion should succeed");

    assert_eq!(response.provider, ProviderId::Gemini);
    assert_eq!(response.text(), "You are not alone.");
    assert_eq!(response.stop_reason, StopReason::EndTurn);
    assert_eq!(response.usage.input_tokens, 11);
    assert_eq!(response.usage.total_tokens, 16);

    let key = transport
        .captured_key
        .lock()
        .expect("key lock")
        .clone()
        .expect("key should be captured");
    assert_eq!(key, "AIza-test-key");

    let captured = transport
        .captured_request
        .lock()
        .expect("request lock")
        .clone()
        .expect("request should be captured");
    assert_eq!(captured.system_instruction.as_deref(), Some("You are CalmSpace."));
    assert_eq!(captured.contents.len(), 1);
    assert_eq!(captured.contents[0].role, GeminiRole::User);
    assert_eq!(captured.generation_config.temperature, Some(0.7));
}

#[tokio::test]
async fn stream_maps_chunks_to_stream_events() {
    let transport = Arc::new(FakeTransport::default());
    let provider = provider_with_key(transport);

    let events = provider
        .stream(request().enable_streaming())
        .await
        .expect("stream should start")
        .collect::<Vec<_>>()
        .await;

    assert_eq!(events.len(), 3);
    assert_eq!(
        events[0].as_ref().expect("first event"),
        &StreamEvent::TextDelta("You are ".to_string())
    );
    assert_eq!(
        events[1].as_ref().expect("second event"),
        &StreamEvent::TextDelta("not alone.".to_string())
    );
    match events[2].as_ref().expect("final event") {
        StreamEvent::ResponseComplete(response) => {
            assert_eq!(response.text(), "You are not alone.");
            assert_eq!(response.provider, ProviderId::Gemini);
        }
        other => panic!("expected response completion, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_api_key_fails_without_calling_transport() {
    let transport = Arc::new(FakeTransport::default());
    let provider = GeminiProvider::new(Arc::new(SecureCredentialManager::new()), transport.clone());

    let err = provider
        .stream(request())
        .await
        .err()
        .expect("stream should fail without a key");

    assert_eq!(err.kind, ProviderErrorKind::Authentication);
    assert!(transport.captured_request.lock().expect("request lock").is_none());
}

#[tokio::test]
async fn invalid_request_is_rejected_before_auth() {
    let transport = Arc::new(FakeTransport::default());
    let provider = provider_with_key(transport.clone());

    let err = provider
        .complete(ModelRequest::new(
            "gemini-pro",
            vec![Message::new(Role::System, "policy only")],
        ))
        .await
        .expect_err("request without user text should fail");

    assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
    assert!(transport.captured_request.lock().expect("request lock").is_none());
}
