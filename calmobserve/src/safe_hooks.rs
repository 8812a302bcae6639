use std::panic::{AssertUnwindSafe, catch_unwind};

use calmchat::{ConversationHooks, ReplySource};
use calmcommon::SessionId;
use calmprovider::ProviderError;

/// Runs the inner hooks and discards any panic they raise, so a faulty
/// observer cannot abort a reply stream.
pub struct SafeConversationHooks<H> {
    inner: H,
}

impl<H> SafeConversationHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ConversationHooks for SafeConversationHooks<H>
where
    H: ConversationHooks,
{
    fn on_send(&self, session_id: &SessionId, model: &str, message_chars: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_send(session_id, model, message_chars)
        }));
    }

    fn on_primary_started(&self, session_id: &SessionId, model: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_primary_started(session_id, model)
        }));
    }

    fn on_primary_failed(&self, session_id: &SessionId, model: &str, error: &ProviderError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_primary_failed(session_id, model, error)
        }));
    }

    fn on_secondary_failed(&self, model: &str, error: &ProviderError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_secondary_failed(model, error)
        }));
    }

    fn on_stream_interrupted(
        &self,
        session_id: &SessionId,
        model: &str,
        delivered_chars: usize,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_stream_interrupted(session_id, model, delivered_chars, error)
        }));
    }

    fn on_turn_complete(&self, session_id: &SessionId, source: ReplySource, reply_chars: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_turn_complete(session_id, source, reply_chars)
        }));
    }
}
