//! Common imports for CalmSpace applications.

pub use crate::{
    CompanionConfig, build_conversation, build_gemini_provider, default_hooks, final_text,
    session_factory, user_message,
};
pub use crate::{
    ChatError, ChatErrorKind, Chunk, ChunkStream, ConversationHooks, ConversationMode,
    ConversationProvider, FallbackResponder, Message, ModelProvider, PacingRange, PromptPolicy,
    ProviderError, ProviderErrorKind, ReplySource, Role, SessionFactory, SessionId, Turn,
};
