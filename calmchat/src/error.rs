//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use calmprovider::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidRequest,
    /// A reply from an earlier `send` on the same conversation is still alive.
    Busy,
    Provider,
    Transcript,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn busy(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Busy, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, message)
    }

    pub fn transcript(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Transcript, message)
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        ChatError::provider(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use calmprovider::ProviderError;

    use super::{ChatError, ChatErrorKind};

    #[test]
    fn provider_errors_convert_with_their_message() {
        let error = ChatError::from(ProviderError::rate_limited("quota exceeded"));

        assert_eq!(error.kind, ChatErrorKind::Provider);
        assert_eq!(error.message, "RateLimited: quota exceeded");
    }

    #[test]
    fn display_includes_kind_and_message() {
        let error = ChatError::busy("reply still streaming");
        assert_eq!(error.to_string(), "Busy: reply still streaming");
    }
}
