//! Degraded replies when the primary model cannot answer.
//!
//! The responder asks a lighter secondary model for a short acknowledgement
//! and, failing that, uses a fixed supportive message. Either way the text is
//! released word by word with typing pauses, so the UI renders it the same
//! way as a live stream.

use std::sync::Arc;

use async_stream::stream;
use calmprovider::{Message, ModelProvider, ModelRequest, ProviderError, Role};
use futures_util::StreamExt;

use crate::{
    Chunk, ChunkStream, ConversationHooks, NoopConversationHooks, RandomizedPacer, ReplySource,
    TypingPacer,
};

pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-pro";

pub const STATIC_FALLBACK_MESSAGE: &str = "I'm here to support you. It sounds like you're going through something difficult. Please know that your feelings are valid.";

const UNKNOWN_TOPIC: &str = "They were trying to talk about something important.";

/// Prompt sent to the secondary model.
pub fn fallback_prompt(user_message: Option<&str>) -> String {
    let topic = user_message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(UNKNOWN_TOPIC);

    format!(
        "The primary AI model has a technical issue. The user's last message was: \"{topic}\" \
         Generate a single, short, empathetic fallback message. Acknowledge a small connection \
         problem, but immediately pivot to show you understood the user's topic and are ready to \
         listen. Example: 'It seems I'm having a little trouble connecting, but I hear you're \
         talking about [user's topic]. I'm still here for you.'"
    )
}

/// Cumulative space-joined word prefixes of `text`.
///
/// ```rust
/// use calmchat::cumulative_words;
///
/// assert_eq!(
///     cumulative_words("I hear you friend"),
///     vec!["I", "I hear", "I hear you", "I hear you friend"]
/// );
/// ```
pub fn cumulative_words(text: &str) -> Vec<String> {
    let mut current = String::new();
    text.split_whitespace()
        .map(|word| {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current.clone()
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackReply {
    pub text: String,
    pub source: ReplySource,
}

impl FallbackReply {
    pub fn fixed() -> Self {
        Self {
            text: STATIC_FALLBACK_MESSAGE.to_string(),
            source: ReplySource::Static,
        }
    }
}

#[derive(Clone)]
pub struct FallbackResponder {
    provider: Arc<dyn ModelProvider>,
    model: String,
    pacer: Arc<dyn TypingPacer>,
    hooks: Arc<dyn ConversationHooks>,
}

impl FallbackResponder {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            model: DEFAULT_FALLBACK_MODEL.to_string(),
            pacer: Arc::new(RandomizedPacer::default()),
            hooks: Arc::new(NoopConversationHooks),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn TypingPacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ConversationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Picks the reply text. Never fails: any secondary error, including an
    /// empty answer, selects the static message.
    pub async fn compose(&self, user_message: Option<&str>) -> FallbackReply {
        match self.ask_secondary(user_message).await {
            Ok(text) => FallbackReply {
                text,
                source: ReplySource::Secondary,
            },
            Err(error) => {
                self.hooks.on_secondary_failed(&self.model, &error);
                FallbackReply::fixed()
            }
        }
    }

    /// Releases `text` one word at a time, pausing before each chunk.
    pub fn emit<'a>(&'a self, text: String) -> ChunkStream<'a> {
        Box::pin(stream! {
            for prefix in cumulative_words(&text) {
                self.pacer.pause().await;
                yield Chunk::new(prefix);
            }
        })
    }

    /// Full fallback path: compose, then emit. Always yields at least one
    /// chunk.
    pub fn respond<'a>(&'a self, user_message: Option<&'a str>) -> ChunkStream<'a> {
        Box::pin(stream! {
            let reply = self.compose(user_message).await;
            let mut chunks = self.emit(reply.text);
            while let Some(chunk) = chunks.next().await {
                yield chunk;
            }
        })
    }

    async fn ask_secondary(&self, user_message: Option<&str>) -> Result<String, ProviderError> {
        let request = ModelRequest::new_validated(
            self.model.clone(),
            vec![Message::new(Role::User, fallback_prompt(user_message))],
        )?;

        let response = self.provider.complete(request).await?;
        let text = response.text().trim();
        if text.is_empty() {
            return Err(ProviderError::other("secondary model returned an empty reply"));
        }

        Ok(text.to_string())
    }
}

impl std::fmt::Debug for FallbackResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackResponder")
            .field("provider", &self.provider.id())
            .field("model", &self.model)
            .field("pacer", &self.pacer)
            .finish_non_exhaustive()
    }
}
