use std::sync::Arc;

use calmchat::{ConversationHooks, ReplySource};
use calmcommon::SessionId;
use calmprovider::ProviderError;

/// Forwards every event to each hook in registration order.
#[derive(Clone, Default)]
pub struct FanoutConversationHooks {
    hooks: Vec<Arc<dyn ConversationHooks>>,
}

impl FanoutConversationHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: Arc<dyn ConversationHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl ConversationHooks for FanoutConversationHooks {
    fn on_send(&self, session_id: &SessionId, model: &str, message_chars: usize) {
        for hooks in &self.hooks {
            hooks.on_send(session_id, model, message_chars);
        }
    }

    fn on_primary_started(&self, session_id: &SessionId, model: &str) {
        for hooks in &self.hooks {
            hooks.on_primary_started(session_id, model);
        }
    }

    fn on_primary_failed(&self, session_id: &SessionId, model: &str, error: &ProviderError) {
        for hooks in &self.hooks {
            hooks.on_primary_failed(session_id, model, error);
        }
    }

    fn on_secondary_failed(&self, model: &str, error: &ProviderError) {
        for hooks in &self.hooks {
            hooks.on_secondary_failed(model, error);
        }
    }

    fn on_stream_interrupted(
        &self,
        session_id: &SessionId,
        model: &str,
        delivered_chars: usize,
        error: &ProviderError,
    ) {
        for hooks in &self.hooks {
            hooks.on_stream_interrupted(session_id, model, delivered_chars, error);
        }
    }

    fn on_turn_complete(&self, session_id: &SessionId, source: ReplySource, reply_chars: usize) {
        for hooks in &self.hooks {
            hooks.on_turn_complete(session_id, source, reply_chars);
        }
    }
}
