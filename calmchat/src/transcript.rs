//! Ordered turn history for one conversation.

use calmprovider::Message;

use crate::{Turn, TurnRole};

/// Append-only list of finalized turns. User and assistant turns are always
/// committed together, so roles strictly alternate starting with the user.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user turn and its reply. Returns `false`, leaving the
    /// transcript untouched, when either side has no visible text.
    pub fn commit_exchange(
        &mut self,
        user: impl Into<String>,
        assistant: impl Into<String>,
    ) -> bool {
        let (user, assistant) = (user.into(), assistant.into());
        if user.trim().is_empty() || assistant.trim().is_empty() {
            return false;
        }

        self.push(TurnRole::User, user);
        self.push(TurnRole::Assistant, assistant);
        true
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn to_messages(&self) -> Vec<Message> {
        self.turns.iter().map(Turn::to_message).collect()
    }

    fn push(&mut self, role: TurnRole, content: String) {
        let sequence = self.turns.len();
        self.turns.push(Turn {
            role,
            content,
            sequence,
        });
    }
}
