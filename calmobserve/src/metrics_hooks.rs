//! Metrics-based observability hooks for conversation phases.
//!
//! ```rust
//! use calmchat::ConversationHooks;
//! use calmobserve::MetricsObservabilityHooks;
//!
//! fn accepts_conversation_hooks(_hooks: &dyn ConversationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_conversation_hooks(&hooks);
//! ```

use calmchat::{ConversationHooks, ReplySource};
use calmcommon::SessionId;
use calmprovider::ProviderError;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ConversationHooks for MetricsObservabilityHooks {
    fn on_send(&self, _session_id: &SessionId, model: &str, message_chars: usize) {
        metrics::counter!(
            "calmspace_conversation_send_total",
            "model" => model.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "calmspace_conversation_message_chars",
            "model" => model.to_string()
        )
        .record(message_chars as f64);
    }

    fn on_primary_started(&self, _session_id: &SessionId, model: &str) {
        metrics::counter!(
            "calmspace_conversation_primary_started_total",
            "model" => model.to_string()
        )
        .increment(1);
    }

    fn on_primary_failed(&self, _session_id: &SessionId, model: &str, error: &ProviderError) {
        metrics::counter!(
            "calmspace_conversation_primary_failed_total",
            "model" => model.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_secondary_failed(&self, model: &str, error: &ProviderError) {
        metrics::counter!(
            "calmspace_conversation_secondary_failed_total",
            "model" => model.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_stream_interrupted(
        &self,
        _session_id: &SessionId,
        model: &str,
        _delivered_chars: usize,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "calmspace_conversation_stream_interrupted_total",
            "model" => model.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_turn_complete(&self, _session_id: &SessionId, source: ReplySource, reply_chars: usize) {
        metrics::counter!(
            "calmspace_conversation_turn_complete_total",
            "source" => source.as_str()
        )
        .increment(1);
        metrics::histogram!(
            "calmspace_conversation_reply_chars",
            "source" => source.as_str()
        )
        .record(reply_chars as f64);
    }
}
