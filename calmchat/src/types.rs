//! Chunk, turn, and conversation mode types.

use std::fmt::{Display, Formatter};
use std::pin::Pin;

use calmprovider::{Message, Role};
use futures_core::Stream;

/// Snapshot of the assistant reply so far. Each chunk for a turn extends the
/// previous one; it is never a delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
}

impl Chunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Lazy, single-pass reply sequence handed to the UI.
pub type ChunkStream<'a> = Pin<Box<dyn Stream<Item = Chunk> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

impl From<TurnRole> for Role {
    fn from(value: TurnRole) -> Self {
        match value {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    /// Zero-based arrival order within the conversation.
    pub sequence: usize,
}

impl Turn {
    pub fn to_message(&self) -> Message {
        Message::new(self.role.into(), self.content.clone())
    }
}

/// Which path produced an assistant reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Primary,
    Secondary,
    Static,
}

impl ReplySource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Static => "static",
        }
    }
}

impl Display for ReplySource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationMode {
    /// Every request carries the full transcript.
    #[default]
    Session,
    /// Every request carries only the prompt policy and the current message.
    Stateless,
}

impl ConversationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Stateless => "stateless",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "session" => Some(Self::Session),
            "stateless" => Some(Self::Stateless),
            _ => None,
        }
    }
}

impl Display for ConversationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
