//! Small convenience helpers for callers driving a conversation.

use futures_util::StreamExt;

use crate::{ChunkStream, ConversationMode, Message, Role};

pub fn system_message(content: impl Into<String>) -> Message {
    Message::new(Role::System, content)
}

pub fn user_message(content: impl Into<String>) -> Message {
    Message::new(Role::User, content)
}

/// Drains a reply and returns its last cumulative chunk, i.e. the full text.
pub async fn final_text(chunks: ChunkStream<'_>) -> String {
    chunks
        .fold(String::new(), |_, chunk| async move { chunk.text })
        .await
}

pub fn parse_mode(value: &str) -> Option<ConversationMode> {
    ConversationMode::parse(value)
}
