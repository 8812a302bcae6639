//! Conversation lifecycle hooks for tracing, metrics, and tests.
//!
//! ```rust
//! use calmchat::{ConversationHooks, NoopConversationHooks};
//!
//! fn accepts_hooks(_hooks: &dyn ConversationHooks) {}
//!
//! accepts_hooks(&NoopConversationHooks);
//! ```

use calmcommon::SessionId;
use calmprovider::ProviderError;

use crate::ReplySource;

/// Every method has an empty default, so implementors only override the
/// events they care about. Hooks run inline on the reply stream and must not
/// block.
pub trait ConversationHooks: Send + Sync {
    /// A non-empty message was accepted for a new reply.
    fn on_send(&self, _session_id: &SessionId, _model: &str, _message_chars: usize) {}

    fn on_primary_started(&self, _session_id: &SessionId, _model: &str) {}

    /// The primary path produced no text; the fallback responder takes over.
    fn on_primary_failed(&self, _session_id: &SessionId, _model: &str, _error: &ProviderError) {}

    /// The secondary model failed and the static message will be used.
    fn on_secondary_failed(&self, _model: &str, _error: &ProviderError) {}

    /// The primary stream failed after text was already delivered.
    fn on_stream_interrupted(
        &self,
        _session_id: &SessionId,
        _model: &str,
        _delivered_chars: usize,
        _error: &ProviderError,
    ) {
    }

    fn on_turn_complete(&self, _session_id: &SessionId, _source: ReplySource, _reply_chars: usize) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopConversationHooks;

impl ConversationHooks for NoopConversationHooks {}
