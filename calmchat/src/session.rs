//! Conversation providers: send a message, stream back the reply.
//!
//! Each `send` returns a lazy chunk sequence. Nothing reaches the network
//! until the sequence is first polled. The primary model is tried once; if
//! it produces no text the fallback responder answers instead, so a polled
//! sequence always yields at least one chunk.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_stream::stream;
use calmcommon::{GenerationOptions, SessionId};
use calmprovider::{Message, ModelProvider, ModelRequest, ProviderError, Role};
use futures_util::StreamExt;

use crate::{
    ChatError, ChunkStream, ConversationHooks, ConversationMode, FallbackResponder, PromptPolicy,
    ReplySource, Transcript, Turn, normalize_stream,
};

/// The only conversation object a UI holds.
pub trait ConversationProvider: Send + Sync {
    fn session_id(&self) -> &SessionId;

    fn mode(&self) -> ConversationMode;

    /// Primary model identifier.
    fn model(&self) -> &str;

    /// Starts a reply to `message`.
    ///
    /// Fails with `InvalidRequest` for blank input and with `Busy` while a
    /// previously returned sequence is still alive. Provider failures are
    /// never surfaced here or through the sequence.
    fn send<'a>(&'a self, message: &str) -> Result<ChunkStream<'a>, ChatError>;

    /// Snapshot of the finalized turns.
    fn turns(&self) -> Result<Vec<Turn>, ChatError>;
}

/// Everything one conversation needs to produce a reply.
pub(crate) struct TurnEngine {
    pub(crate) session_id: SessionId,
    pub(crate) model: String,
    pub(crate) policy: PromptPolicy,
    pub(crate) provider: Arc<dyn ModelProvider>,
    pub(crate) fallback: Arc<FallbackResponder>,
    pub(crate) options: GenerationOptions,
    pub(crate) hooks: Arc<dyn ConversationHooks>,
    transcript: Mutex<Transcript>,
    in_flight: AtomicBool,
}

impl TurnEngine {
    pub(crate) fn new(
        model: String,
        policy: PromptPolicy,
        provider: Arc<dyn ModelProvider>,
        fallback: Arc<FallbackResponder>,
        options: GenerationOptions,
        hooks: Arc<dyn ConversationHooks>,
    ) -> Self {
        Self {
            session_id: SessionId::generate(),
            model,
            policy,
            provider,
            fallback,
            options,
            hooks,
            transcript: Mutex::new(Transcript::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    fn transcript(&self) -> Result<MutexGuard<'_, Transcript>, ChatError> {
        self.transcript
            .lock()
            .map_err(|_| ChatError::transcript("conversation transcript lock poisoned"))
    }

    fn turns(&self) -> Result<Vec<Turn>, ChatError> {
        Ok(self.transcript()?.turns().to_vec())
    }

    fn send<'a>(
        &'a self,
        message: &str,
        mode: ConversationMode,
    ) -> Result<ChunkStream<'a>, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::invalid_request("message must not be empty"));
        }

        let guard = InFlightGuard::acquire(&self.in_flight)?;

        let mut messages = vec![self.policy.to_message()];
        if mode == ConversationMode::Session {
            messages.extend(self.transcript()?.to_messages());
        }
        messages.push(Message::new(Role::User, message));

        let request = ModelRequest::builder(self.model.clone())
            .options(self.options)
            .enable_streaming()
            .messages(messages)
            .build();

        self.hooks
            .on_send(&self.session_id, &self.model, message.chars().count());

        Ok(self.reply(message.to_string(), request, guard))
    }

    fn reply<'a>(
        &'a self,
        user_text: String,
        request: Result<ModelRequest, ProviderError>,
        guard: InFlightGuard<'a>,
    ) -> ChunkStream<'a> {
        Box::pin(stream! {
            let _guard = guard;
            let mut pending = PendingTurn::new(&self.transcript, user_text);

            self.hooks.on_primary_started(&self.session_id, &self.model);
            let started = match request {
                Ok(request) => self.provider.stream(request).await,
                Err(error) => Err(error),
            };

            let mut failure = None;
            let mut interrupted = false;
            match started {
                Ok(events) => {
                    let mut chunks = normalize_stream(events);
                    while let Some(item) = chunks.next().await {
                        match item {
                            Ok(chunk) if chunk.text.trim().is_empty() => {}
                            Ok(chunk) => {
                                pending.update(&chunk.text);
                                yield chunk;
                            }
                            Err(error) if pending.has_reply() => {
                                self.hooks.on_stream_interrupted(
                                    &self.session_id,
                                    &self.model,
                                    pending.reply_chars(),
                                    &error,
                                );
                                interrupted = true;
                                break;
                            }
                            Err(error) => {
                                failure = Some(error);
                                break;
                            }
                        }
                    }

                    if failure.is_none() && !interrupted && !pending.has_reply() {
                        failure = Some(ProviderError::other(
                            "primary model returned an empty reply",
                        ));
                    }
                }
                Err(error) => failure = Some(error),
            }

            let source = match failure {
                None => ReplySource::Primary,
                Some(error) => {
                    self.hooks.on_primary_failed(&self.session_id, &self.model, &error);

                    let reply = self.fallback.compose(Some(pending.user_text())).await;
                    let mut chunks = self.fallback.emit(reply.text);
                    while let Some(chunk) = chunks.next().await {
                        pending.update(&chunk.text);
                        yield chunk;
                    }

                    reply.source
                }
            };

            let reply_chars = pending.reply_chars();
            pending.commit();
            self.hooks.on_turn_complete(&self.session_id, source, reply_chars);
        })
    }
}

/// Marks a conversation as having a live reply sequence.
pub(crate) struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self, ChatError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ChatError::busy("a reply is still streaming for this conversation"))?;

        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// User text plus the assistant text delivered so far. Commits to the
/// transcript explicitly at the end of a reply, or on drop if the consumer
/// abandons the sequence after at least one chunk. Whitespace-only text is
/// never committed.
struct PendingTurn<'a> {
    transcript: &'a Mutex<Transcript>,
    user_text: String,
    reply: String,
    committed: bool,
}

impl<'a> PendingTurn<'a> {
    fn new(transcript: &'a Mutex<Transcript>, user_text: String) -> Self {
        Self {
            transcript,
            user_text,
            reply: String::new(),
            committed: false,
        }
    }

    fn user_text(&self) -> &str {
        &self.user_text
    }

    fn update(&mut self, cumulative: &str) {
        self.reply.clear();
        self.reply.push_str(cumulative);
    }

    fn has_reply(&self) -> bool {
        !self.reply.trim().is_empty()
    }

    fn reply_chars(&self) -> usize {
        self.reply.chars().count()
    }

    fn commit(mut self) {
        self.commit_once();
    }

    fn commit_once(&mut self) {
        if self.committed || !self.has_reply() {
            return;
        }

        self.committed = true;
        // A poisoned transcript cannot be repaired from here; the next
        // `turns` call reports it.
        if let Ok(mut transcript) = self.transcript.lock() {
            transcript.commit_exchange(
                std::mem::take(&mut self.user_text),
                std::mem::take(&mut self.reply),
            );
        }
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        self.commit_once();
    }
}

/// Conversation that sends the full transcript with every message.
pub struct ConversationSession {
    engine: TurnEngine,
}

impl ConversationSession {
    pub(crate) fn from_engine(engine: TurnEngine) -> Self {
        Self { engine }
    }

    pub fn policy(&self) -> &PromptPolicy {
        &self.engine.policy
    }
}

impl ConversationProvider for ConversationSession {
    fn session_id(&self) -> &SessionId {
        &self.engine.session_id
    }

    fn mode(&self) -> ConversationMode {
        ConversationMode::Session
    }

    fn model(&self) -> &str {
        &self.engine.model
    }

    fn send<'a>(&'a self, message: &str) -> Result<ChunkStream<'a>, ChatError> {
        self.engine.send(message, ConversationMode::Session)
    }

    fn turns(&self) -> Result<Vec<Turn>, ChatError> {
        self.engine.turns()
    }
}

/// Conversation whose requests carry only the prompt policy and the current
/// message. Turns are still recorded locally.
pub struct StatelessConversation {
    engine: TurnEngine,
}

impl StatelessConversation {
    pub(crate) fn from_engine(engine: TurnEngine) -> Self {
        Self { engine }
    }

    pub fn policy(&self) -> &PromptPolicy {
        &self.engine.policy
    }
}

impl ConversationProvider for StatelessConversation {
    fn session_id(&self) -> &SessionId {
        &self.engine.session_id
    }

    fn mode(&self) -> ConversationMode {
        ConversationMode::Stateless
    }

    fn model(&self) -> &str {
        &self.engine.model
    }

    fn send<'a>(&'a self, message: &str) -> Result<ChunkStream<'a>, ChatError> {
        self.engine.send(message, ConversationMode::Stateless)
    }

    fn turns(&self) -> Result<Vec<Turn>, ChatError> {
        self.engine.turns()
    }
}

impl std::fmt::Debug for ConversationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationSession")
            .field("session_id", &self.engine.session_id)
            .field("model", &self.engine.model)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for StatelessConversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatelessConversation")
            .field("session_id", &self.engine.session_id)
            .field("model", &self.engine.model)
            .finish_non_exhaustive()
    }
}
