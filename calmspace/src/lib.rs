//! CalmSpace conversation service facade.
//!
//! This crate is the single dependency a UI needs. It re-exports the
//! workspace crates and wires configuration, the Gemini provider, and the
//! default observability hooks into a ready [`ConversationProvider`].
//!
//! ```rust,no_run
//! use calmspace::prelude::*;
//!
//! # async fn run() -> Result<(), ProviderError> {
//! let conversation = build_conversation(&CompanionConfig::from_env())?;
//! let reply = conversation
//!     .send("I couldn't sleep last night")
//!     .map_err(|error| ProviderError::invalid_request(error.to_string()))?;
//! println!("{}", final_text(reply).await);
//! # Ok(())
//! # }
//! ```

mod config;

pub mod prelude;
pub mod providers;
pub mod runtime;
pub mod util;

pub use calmchat;
pub use calmcommon;
pub use calmobserve;
pub use calmprovider;

pub use calmchat::{
    ChatError, ChatErrorKind, Chunk, ChunkStream, ConversationHooks, ConversationMode,
    ConversationProvider, ConversationSession, DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL,
    FallbackReply, FallbackResponder, ImmediatePacer, NoopConversationHooks, PacingRange,
    PromptPolicy, RandomizedPacer, ReplySource, STATIC_FALLBACK_MESSAGE, SessionFactory,
    StatelessConversation, Transcript, Turn, TurnRole, TypingPacer,
};
pub use calmcommon::{BoxFuture, GenerationOptions, SessionId};
pub use calmobserve::{
    FanoutConversationHooks, MetricsObservabilityHooks, SafeConversationHooks,
    TracingObservabilityHooks,
};
pub use calmprovider::{
    BoxedEventStream, Message, ModelEventStream, ModelProvider, ModelRequest,
    ModelRequestBuilder, ModelResponse, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderId, Role, SecretString, SecureCredentialManager, StopReason, StreamEvent, TokenUsage,
    VecEventStream,
};

pub use config::{
    API_KEY_ENV, CONVERSATION_MODE_ENV, CompanionConfig, FALLBACK_MODEL_ENV, PRIMARY_MODEL_ENV,
};
pub use providers::build_gemini_provider;
pub use runtime::{build_conversation, default_hooks, session_factory};
pub use util::{final_text, parse_mode, system_message, user_message};
