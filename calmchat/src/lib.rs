//! Streaming conversation sessions over model providers.
//!
//! A [`SessionFactory`] builds a [`ConversationProvider`]. Each `send` returns
//! a lazy stream of cumulative [`Chunk`]s from the primary model, or from the
//! [`FallbackResponder`] when the primary path produced no text.

mod error;
mod factory;
mod fallback;
mod hooks;
mod normalizer;
mod pacing;
mod policy;
mod session;
mod transcript;
mod types;

pub mod prelude {
    pub use crate::{
        ChatError, ChatErrorKind, Chunk, ChunkStream, ConversationHooks, ConversationMode,
        ConversationProvider, FallbackResponder, ImmediatePacer, NoopConversationHooks,
        PacingRange, PromptPolicy, RandomizedPacer, ReplySource, SessionFactory, Turn, TurnRole,
        TypingPacer,
    };
    pub use calmcommon::SessionId;
}

pub use error::{ChatError, ChatErrorKind};
pub use factory::{DEFAULT_PRIMARY_MODEL, SessionFactory};
pub use fallback::{
    DEFAULT_FALLBACK_MODEL, FallbackReply, FallbackResponder, STATIC_FALLBACK_MESSAGE,
    cumulative_words, fallback_prompt,
};
pub use hooks::{ConversationHooks, NoopConversationHooks};
pub use normalizer::{NormalizedStream, normalize_stream};
pub use pacing::{ImmediatePacer, PacingRange, RandomizedPacer, TypingPacer};
pub use policy::PromptPolicy;
pub use session::{ConversationProvider, ConversationSession, StatelessConversation};
pub use transcript::Transcript;
pub use types::{Chunk, ChunkStream, ConversationMode, ReplySource, Turn, TurnRole};
pub use calmcommon::SessionId;
