//! One-call wiring from configuration to a ready conversation.

use std::sync::Arc;

use calmobserve::{
    FanoutConversationHooks, MetricsObservabilityHooks, SafeConversationHooks,
    TracingObservabilityHooks,
};

use crate::{
    CompanionConfig, ConversationHooks, ConversationProvider, FallbackResponder, ModelProvider,
    PromptPolicy, ProviderError, RandomizedPacer, SessionFactory, build_gemini_provider,
};

/// Tracing and metrics hooks, each isolated from panics.
pub fn default_hooks() -> Arc<dyn ConversationHooks> {
    Arc::new(
        FanoutConversationHooks::new()
            .with(Arc::new(SafeConversationHooks::new(TracingObservabilityHooks)))
            .with(Arc::new(SafeConversationHooks::new(MetricsObservabilityHooks))),
    )
}

/// Factory over `provider` configured from `config`, with default hooks.
pub fn session_factory(
    provider: Arc<dyn ModelProvider>,
    config: &CompanionConfig,
) -> SessionFactory {
    let fallback = FallbackResponder::new(Arc::clone(&provider))
        .with_model(config.fallback_model.clone())
        .with_pacer(Arc::new(RandomizedPacer::new(config.pacing)));

    SessionFactory::new(provider)
        .with_fallback(fallback)
        .with_hooks(default_hooks())
        .with_generation_options(config.generation)
        .with_mode(config.mode)
}

/// Builds a conversation against Gemini using the built-in CalmSpace policy.
pub fn build_conversation(
    config: &CompanionConfig,
) -> Result<Box<dyn ConversationProvider>, ProviderError> {
    let provider = build_gemini_provider(config)?;
    let factory = session_factory(provider, config);

    Ok(factory.create_session(config.primary_model.clone(), PromptPolicy::calmspace()))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use futures_util::StreamExt;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    use crate::{
        BoxedEventStream, CompanionConfig, ConversationMode, Message, ModelProvider, ModelRequest,
        ModelResponse, PacingRange, ProviderError, ProviderFuture, ProviderId, Role,
        STATIC_FALLBACK_MESSAGE, StopReason, TokenUsage, VecEventStream,
    };

    use super::{build_conversation, session_factory};

    #[derive(Debug, Default)]
    struct RecordingProvider {
        models: Mutex<Vec<String>>,
    }

    impl ModelProvider for RecordingProvider {
        fn id(&self) -> ProviderId {
            ProviderId::Gemini
        }

        fn complete<'a>(
            &'a self,
            request: ModelRequest,
        ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
            Box::pin(async move {
                self.models.lock().expect("models lock").push(request.model.clone());
                Ok(ModelResponse {
                    provider: ProviderId::Gemini,
                    model: request.model,
                    message: Message::new(Role::Assistant, "unused"),
                    stop_reason: StopReason::EndTurn,
                    usage: TokenUsage::default(),
                })
            })
        }

        fn stream<'a>(
            &'a self,
            request: ModelRequest,
        ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
            Box::pin(async move {
                self.models.lock().expect("models lock").push(request.model.clone());
                assert_eq!(request.options.temperature, Some(0.2));
                Ok(Box::pin(VecEventStream::text_deltas(["calm ", "down"])) as BoxedEventStream<'a>)
            })
        }
    }

    #[derive(Clone, Default)]
    struct WarnCounter(Arc<Mutex<usize>>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                *self.0.lock().expect("warn lock") += 1;
            }
        }
    }

    #[test]
    fn missing_api_key_warns_once_on_the_build_path() {
        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());

        tracing::subscriber::with_default(subscriber, || {
            let config = CompanionConfig::from_lookup(|_| None);
            build_conversation(&config).expect("conversation should build");
        });

        assert_eq!(*counter.0.lock().expect("warn lock"), 1);
    }

    #[tokio::test]
    async fn session_factory_applies_config() {
        let provider = Arc::new(RecordingProvider::default());
        let config = CompanionConfig::new()
            .with_mode(ConversationMode::Stateless)
            .with_generation(calmcommon::GenerationOptions::conversation_defaults().with_temperature(0.2));

        let session = session_factory(provider.clone(), &config)
            .create_session("gemini-custom", crate::PromptPolicy::calmspace());
        assert_eq!(session.mode(), ConversationMode::Stateless);

        let chunks = session
            .send("hello")
            .expect("send should start")
            .map(|chunk| chunk.text)
            .collect::<Vec<_>>()
            .await;

        assert_eq!(chunks, vec!["calm ", "calm down"]);
        assert_eq!(
            *provider.models.lock().expect("models lock"),
            vec!["gemini-custom".to_string()]
        );
    }

    #[tokio::test]
    async fn missing_api_key_still_answers_with_static_fallback() {
        let config = CompanionConfig::new()
            .with_base_url("http://127.0.0.1:9")
            .with_pacing(PacingRange::from_millis(0, 0));

        let session = build_conversation(&config).expect("conversation should build");
        let chunks = session
            .send("is anyone there?")
            .expect("send should start")
            .map(|chunk| chunk.text)
            .collect::<Vec<_>>()
            .await;

        assert_eq!(chunks.last().map(String::as_str), Some(STATIC_FALLBACK_MESSAGE));
        assert_eq!(session.turns().expect("turns").len(), 2);
    }
}
