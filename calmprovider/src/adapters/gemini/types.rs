//! Gemini adapter types and provider-agnostic conversion logic.

use crate::{
    Message, ModelResponse, ProviderId, Role, StopReason, StreamEvent, TokenUsage,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub contents: Vec<GeminiContent>,
    pub generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiContent {
    pub role: GeminiRole,
    pub text: String,
}

impl GeminiContent {
    pub fn new(role: GeminiRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiRole {
    User,
    Model,
}

impl GeminiRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeminiGenerationConfig {
    pub temperature: Option<f32>,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GeminiGenerationConfig {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.top_k.is_none()
            && self.top_p.is_none()
            && self.max_output_tokens.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiResponse {
    pub model: String,
    pub text: String,
    pub finish_reason: GeminiFinishReason,
    pub usage: GeminiUsage,
}

impl GeminiResponse {
    pub(crate) fn into_model_response(self) -> ModelResponse {
        ModelResponse {
            provider: ProviderId::Gemini,
            model: self.model,
            message: Message::new(Role::Assistant, self.text),
            stop_reason: self.finish_reason.into(),
            usage: self.usage.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiFinishReason {
    Stop,
    MaxTokens,
    Safety,
    Other,
}

impl From<GeminiFinishReason> for StopReason {
    fn from(value: GeminiFinishReason) -> Self {
        match value {
            GeminiFinishReason::Stop => Self::EndTurn,
            GeminiFinishReason::MaxTokens => Self::MaxTokens,
            GeminiFinishReason::Safety => Self::Safety,
            GeminiFinishReason::Other => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeminiUsage {
    pub prompt_tokens: u32,
    pub candidates_tokens: u32,
    pub total_tokens: u32,
}

impl From<GeminiUsage> for TokenUsage {
    fn from(value: GeminiUsage) -> Self {
        Self {
            input_tokens: value.prompt_tokens,
            output_tokens: value.candidates_tokens,
            total_tokens: value.total_tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeminiStreamChunk {
    TextDelta(String),
    ResponseComplete(GeminiResponse),
}

impl From<GeminiStreamChunk> for StreamEvent {
    fn from(value: GeminiStreamChunk) -> Self {
        match value {
            GeminiStreamChunk::TextDelta(delta) => Self::TextDelta(delta),
            GeminiStreamChunk::ResponseComplete(response) => {
                Self::ResponseComplete(response.into_model_response())
            }
        }
    }
}
