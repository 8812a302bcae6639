//! Session construction.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use calmchat::{ConversationMode, ConversationProvider, PromptPolicy, SessionFactory};
//! use calmprovider::{
//!     BoxedEventStream, ModelProvider, ModelRequest, ModelResponse, ProviderError,
//!     ProviderFuture, ProviderId,
//! };
//!
//! struct Offline;
//!
//! impl ModelProvider for Offline {
//!     fn id(&self) -> ProviderId {
//!         ProviderId::Gemini
//!     }
//!
//!     fn complete<'a>(
//!         &'a self,
//!         _request: ModelRequest,
//!     ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
//!         Box::pin(async { Err(ProviderError::unavailable("offline")) })
//!     }
//!
//!     fn stream<'a>(
//!         &'a self,
//!         _request: ModelRequest,
//!     ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
//!         Box::pin(async { Err(ProviderError::unavailable("offline")) })
//!     }
//! }
//!
//! let factory = SessionFactory::new(Arc::new(Offline)).with_mode(ConversationMode::Stateless);
//! let session = factory.create_session("gemini-2.0-flash-exp", PromptPolicy::calmspace());
//!
//! assert_eq!(session.mode(), ConversationMode::Stateless);
//! assert_eq!(session.model(), "gemini-2.0-flash-exp");
//! ```

use std::sync::Arc;

use calmcommon::GenerationOptions;
use calmprovider::ModelProvider;

use crate::session::TurnEngine;
use crate::{
    ConversationHooks, ConversationMode, ConversationProvider, ConversationSession,
    FallbackResponder, NoopConversationHooks, PromptPolicy, StatelessConversation,
};

pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-2.0-flash-exp";

#[derive(Clone)]
pub struct SessionFactory {
    provider: Arc<dyn ModelProvider>,
    fallback: FallbackResponder,
    hooks: Arc<dyn ConversationHooks>,
    options: GenerationOptions,
    mode: ConversationMode,
}

impl SessionFactory {
    /// Uses `provider` for both primary and secondary calls, the default
    /// sampling settings, and full-history sessions.
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            fallback: FallbackResponder::new(provider.clone()),
            provider,
            hooks: Arc::new(NoopConversationHooks),
            options: GenerationOptions::conversation_defaults(),
            mode: ConversationMode::Session,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackResponder) -> Self {
        self.fallback = fallback;
        self
    }

    /// Hooks for the session and for its fallback responder.
    pub fn with_hooks(mut self, hooks: Arc<dyn ConversationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_generation_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_mode(mut self, mode: ConversationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ConversationMode {
        self.mode
    }

    pub fn create_session(
        &self,
        model: impl Into<String>,
        policy: PromptPolicy,
    ) -> Box<dyn ConversationProvider> {
        let fallback = self.fallback.clone().with_hooks(self.hooks.clone());
        let engine = TurnEngine::new(
            model.into(),
            policy,
            self.provider.clone(),
            Arc::new(fallback),
            self.options,
            self.hooks.clone(),
        );

        match self.mode {
            ConversationMode::Session => Box::new(ConversationSession::from_engine(engine)),
            ConversationMode::Stateless => Box::new(StatelessConversation::from_engine(engine)),
        }
    }
}

impl std::fmt::Debug for SessionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionFactory")
            .field("provider", &self.provider.id())
            .field("fallback", &self.fallback)
            .field("options", &self.options)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
