//! Tracing-based observability hooks for conversation phases.
//!
//! ```rust
//! use calmchat::ConversationHooks;
//! use calmobserve::TracingObservabilityHooks;
//!
//! fn accepts_conversation_hooks(_hooks: &dyn ConversationHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_conversation_hooks(&hooks);
//! ```

use calmchat::{ConversationHooks, ReplySource};
use calmcommon::SessionId;
use calmprovider::ProviderError;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ConversationHooks for TracingObservabilityHooks {
    fn on_send(&self, session_id: &SessionId, model: &str, message_chars: usize) {
        tracing::info!(
            phase = "conversation",
            event = "send",
            session_id = %session_id,
            model,
            message_chars = message_chars as u64
        );
    }

    fn on_primary_started(&self, session_id: &SessionId, model: &str) {
        tracing::debug!(
            phase = "conversation",
            event = "primary_started",
            session_id = %session_id,
            model
        );
    }

    fn on_primary_failed(&self, session_id: &SessionId, model: &str, error: &ProviderError) {
        tracing::warn!(
            phase = "conversation",
            event = "primary_failed",
            session_id = %session_id,
            model,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_secondary_failed(&self, model: &str, error: &ProviderError) {
        tracing::error!(
            phase = "conversation",
            event = "secondary_failed",
            model,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_stream_interrupted(
        &self,
        session_id: &SessionId,
        model: &str,
        delivered_chars: usize,
        error: &ProviderError,
    ) {
        tracing::warn!(
            phase = "conversation",
            event = "stream_interrupted",
            session_id = %session_id,
            model,
            delivered_chars = delivered_chars as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_turn_complete(&self, session_id: &SessionId, source: ReplySource, reply_chars: usize) {
        tracing::info!(
            phase = "conversation",
            event = "turn_complete",
            session_id = %session_id,
            source = source.as_str(),
            reply_chars = reply_chars as u64
        );
    }
}
