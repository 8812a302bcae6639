//! Provider-agnostic model contracts plus the Gemini adapter used by the
//! conversation layer.
//!
//! ```rust
//! use calmprovider::{Message, ModelRequest, Role};
//!
//! let request = ModelRequest::builder("gemini-2.0-flash-exp")
//!     .message(Message::new(Role::System, "Be kind."))
//!     .message(Message::new(Role::User, "hello"))
//!     .enable_streaming()
//!     .build()
//!     .expect("request should validate");
//!
//! assert!(request.options.stream);
//! assert_eq!(request.messages.len(), 2);
//! ```

mod credentials;
mod error;
mod model;
mod provider;
mod stream;

pub mod adapters;
pub mod prelude;

pub use calmcommon::{BoxFuture, GenerationOptions};
pub use credentials::{SecretString, SecureCredentialManager};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    Message, ModelRequest, ModelRequestBuilder, ModelResponse, ProviderId, Role, StopReason,
    TokenUsage,
};
pub use provider::{ModelProvider, ProviderFuture};
pub use stream::{BoxedEventStream, ModelEventStream, StreamEvent, VecEventStream};

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::task::{Context, Poll, Waker};

    use futures_core::Stream;

    use super::*;

    #[derive(Debug)]
    struct FakeProvider;

    impl ModelProvider for FakeProvider {
        fn id(&self) -> ProviderId {
            ProviderId::Gemini
        }

        fn complete<'a>(
            &'a self,
            request: ModelRequest,
        ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
            Box::pin(async move {
                request.validate()?;
                Ok(ModelResponse {
                    provider: ProviderId::Gemini,
                    model: request.model,
                    message: Message::new(Role::Assistant, "hello from provider"),
                    stop_reason: StopReason::EndTurn,
                    usage: TokenUsage {
                        input_tokens: 5,
                        output_tokens: 4,
                        total_tokens: 9,
                    },
                })
            })
        }

        fn stream<'a>(
            &'a self,
            request: ModelRequest,
        ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
            Box::pin(async move {
                request.validate()?;
                let stream = VecEventStream::new(vec![
                    Ok(StreamEvent::TextDelta("hello".to_string())),
                    Ok(StreamEvent::TextDelta(" world".to_string())),
                ]);
                Ok(Box::pin(stream) as BoxedEventStream<'a>)
            })
        }
    }

    #[test]
    fn provider_id_display_is_stable() {
        assert_eq!(ProviderId::Gemini.to_string(), "gemini");
    }

    #[test]
    fn provider_error_helper_builders_assign_expected_retryability() {
        let auth = ProviderError::authentication("bad key");
        assert!(!auth.retryable);
        assert_eq!(auth.kind, ProviderErrorKind::Authentication);

        let timeout = ProviderError::timeout("request timed out");
        assert!(timeout.retryable);
        assert_eq!(timeout.kind, ProviderErrorKind::Timeout);

        let rate_limited = ProviderError::rate_limited("quota exhausted");
        assert!(rate_limited.retryable);
        assert_eq!(rate_limited.kind, ProviderErrorKind::RateLimited);
    }

    #[test]
    fn vec_event_stream_yields_events_in_order() {
        let mut stream = Box::pin(VecEventStream::new(vec![
            Ok(StreamEvent::TextDelta("one".into())),
            Ok(StreamEvent::TextDelta("two".into())),
        ]));
        let mut cx = Context::from_waker(Waker::noop());

        assert_eq!(
            stream.as_mut().poll_next(&mut cx),
            Poll::Ready(Some(Ok(StreamEvent::TextDelta("one".into()))))
        );
        assert_eq!(
            stream.as_mut().poll_next(&mut cx),
            Poll::Ready(Some(Ok(StreamEvent::TextDelta("two".into()))))
        );
        assert_eq!(stream.as_mut().poll_next(&mut cx), Poll::Ready(None));
    }

    #[test]
    fn model_provider_complete_and_stream_follow_contract() {
        let provider = FakeProvider;
        let request = ModelRequest::new("gemini-pro", vec![Message::new(Role::User, "hi")]);

        let response = block_on(provider.complete(request.clone())).expect("completion");
        assert_eq!(response.provider, ProviderId::Gemini);
        assert_eq!(response.text(), "hello from provider");

        let mut stream = block_on(provider.stream(request)).expect("stream should work");
        let mut cx = Context::from_waker(Waker::noop());
        assert_eq!(
            stream.as_mut().poll_next(&mut cx),
            Poll::Ready(Some(Ok(StreamEvent::TextDelta("hello".to_string()))))
        );
        assert_eq!(
            stream.as_mut().poll_next(&mut cx),
            Poll::Ready(Some(Ok(StreamEvent::TextDelta(" world".to_string()))))
        );
        assert_eq!(stream.as_mut().poll_next(&mut cx), Poll::Ready(None));
    }

    #[test]
    fn model_provider_rejects_invalid_requests_before_streaming() {
        let provider = FakeProvider;
        let request = ModelRequest::new("gemini-pro", Vec::new());

        let error = match block_on(provider.stream(request)) {
            Ok(_) => panic!("empty request must fail"),
            Err(error) => error,
        };
        assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    }

    fn block_on<F: Future>(future: F) -> F::Output {
        let mut future = std::pin::pin!(future);
        let mut cx = Context::from_waker(Waker::noop());

        loop {
            match future.as_mut().poll(&mut cx) {
                Poll::Ready(value) => return value,
                Poll::Pending => std::thread::yield_now(),
            }
        }
    }
}
