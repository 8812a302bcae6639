//! Gemini HTTP payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};

use crate::ProviderError;

use super::types::{
    GeminiContent, GeminiFinishReason, GeminiGenerationConfig, GeminiRequest, GeminiResponse,
    GeminiUsage,
};

pub(crate) fn build_api_request(request: GeminiRequest) -> Result<GeminiApiRequest, ProviderError> {
    let contents = request
        .contents
        .into_iter()
        .map(GeminiApiContent::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    if contents.is_empty() {
        return Err(ProviderError::invalid_request(
            "Gemini request requires at least one content entry",
        ));
    }

    let system_instruction = request
        .system_instruction
        .filter(|text| !text.trim().is_empty())
        .map(|text| GeminiApiContent {
            role: None,
            parts: vec![GeminiApiPart { text }],
        });

    let generation_config = if request.generation_config.is_empty() {
        None
    } else {
        Some(GeminiApiGenerationConfig::from(request.generation_config))
    };

    Ok(GeminiApiRequest {
        contents,
        system_instruction,
        generation_config,
    })
}

pub(crate) fn parse_finish_reason(value: Option<&str>) -> GeminiFinishReason {
    match value {
        Some("STOP") => GeminiFinishReason::Stop,
        Some("MAX_TOKENS") => GeminiFinishReason::MaxTokens,
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII") => {
            GeminiFinishReason::Safety
        }
        _ => GeminiFinishReason::Other,
    }
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<GeminiApiErrorEnvelope>(body).ok()?;
    Some(parsed.error.message)
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiErrorEnvelope {
    pub error: GeminiApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiError {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiRequest {
    pub contents: Vec<GeminiApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiApiGenerationConfig>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeminiApiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<GeminiApiPart>,
}

impl TryFrom<GeminiContent> for GeminiApiContent {
    type Error = ProviderError;

    fn try_from(value: GeminiContent) -> Result<Self, Self::Error> {
        if value.text.trim().is_empty() {
            return Err(ProviderError::invalid_request(
                "Gemini content text must not be empty",
            ));
        }

        Ok(Self {
            role: Some(value.role.as_str().to_string()),
            parts: vec![GeminiApiPart { text: value.text }],
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GeminiApiPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl From<GeminiGenerationConfig> for GeminiApiGenerationConfig {
    fn from(value: GeminiGenerationConfig) -> Self {
        Self {
            temperature: value.temperature,
            top_k: value.top_k,
            top_p: value.top_p,
            max_output_tokens: value.max_output_tokens,
        }
    }
}

/// Shared shape of `generateContent` responses and each SSE payload of
/// `streamGenerateContent`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiApiCandidate>,
    pub usage_metadata: Option<GeminiApiUsage>,
    pub model_version: Option<String>,
    pub prompt_feedback: Option<GeminiApiPromptFeedback>,
}

impl GeminiApiResponse {
    /// Concatenated text of the first candidate's parts.
    pub(crate) fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    pub(crate) fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
    }

    pub(crate) fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
    }

    pub(crate) fn usage(&self) -> GeminiUsage {
        self.usage_metadata
            .as_ref()
            .map(|usage| GeminiUsage {
                prompt_tokens: usage.prompt_token_count,
                candidates_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiCandidate {
    pub content: Option<GeminiApiCandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiCandidateContent {
    #[serde(default)]
    pub parts: Vec<GeminiApiCandidatePart>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeminiApiCandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiUsage {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiApiPromptFeedback {
    pub block_reason: Option<String>,
}

impl GeminiApiResponse {
    pub(crate) fn into_response(
        self,
        requested_model: String,
    ) -> Result<GeminiResponse, ProviderError> {
        if let Some(reason) = self.block_reason() {
            return Err(ProviderError::blocked(format!(
                "Gemini blocked the prompt: {reason}"
            )));
        }

        if self.candidates.is_empty() {
            return Err(ProviderError::transport(
                "Gemini response did not include candidates",
            ));
        }

        Ok(GeminiResponse {
            text: self.text(),
            finish_reason: parse_finish_reason(self.finish_reason()),
            usage: self.usage(),
            model: self.model_version.unwrap_or(requested_model),
        })
    }
}
