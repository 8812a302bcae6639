//! Environment-driven configuration for a companion conversation.
//!
//! ```rust
//! use calmspace::{CompanionConfig, ConversationMode};
//!
//! let config = CompanionConfig::from_lookup(|name| match name {
//!     "GEMINI_API_KEY" => Some("AIza-example".to_string()),
//!     "CALMSPACE_CONVERSATION_MODE" => Some("stateless".to_string()),
//!     _ => None,
//! });
//!
//! assert!(config.has_api_key());
//! assert_eq!(config.mode, ConversationMode::Stateless);
//! assert_eq!(config.primary_model, "gemini-2.0-flash-exp");
//! ```

use std::time::Duration;

use calmchat::{ConversationMode, DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL, PacingRange};
use calmcommon::GenerationOptions;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const PRIMARY_MODEL_ENV: &str = "CALMSPACE_PRIMARY_MODEL";
pub const FALLBACK_MODEL_ENV: &str = "CALMSPACE_FALLBACK_MODEL";
pub const CONVERSATION_MODE_ENV: &str = "CALMSPACE_CONVERSATION_MODE";

#[derive(Clone, PartialEq)]
pub struct CompanionConfig {
    pub api_key: Option<String>,
    pub primary_model: String,
    pub fallback_model: String,
    pub generation: GenerationOptions,
    pub mode: ConversationMode,
    pub timeout: Duration,
    /// Overrides the public Gemini endpoint, e.g. for a proxy.
    pub base_url: Option<String>,
    pub pacing: PacingRange,
}

impl CompanionConfig {
    pub fn new() -> Self {
        Self {
            api_key: None,
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            generation: GenerationOptions::conversation_defaults(),
            mode: ConversationMode::Session,
            timeout: Duration::from_secs(90),
            base_url: None,
            pacing: PacingRange::default(),
        }
    }

    /// Reads the process environment. A missing API key is logged, not
    /// rejected: requests then fail authentication and the fallback answers.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::new();
        config.api_key = read(API_KEY_ENV);
        if config.api_key.is_none() {
            tracing::warn!(
                phase = "config",
                env = API_KEY_ENV,
                "Gemini API key not found; replies will use the fallback responder"
            );
        }

        if let Some(model) = read(PRIMARY_MODEL_ENV) {
            config.primary_model = model;
        }

        if let Some(model) = read(FALLBACK_MODEL_ENV) {
            config.fallback_model = model;
        }

        if let Some(value) = read(CONVERSATION_MODE_ENV) {
            match ConversationMode::parse(&value) {
                Some(mode) => config.mode = mode,
                None => tracing::warn!(
                    phase = "config",
                    env = CONVERSATION_MODE_ENV,
                    value = value.as_str(),
                    "unknown conversation mode; using session"
                ),
            }
        }

        config
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_primary_model(mut self, model: impl Into<String>) -> Self {
        self.primary_model = model.into();
        self
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn with_generation(mut self, generation: GenerationOptions) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_mode(mut self, mode: ConversationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_pacing(mut self, pacing: PacingRange) -> Self {
        self.pacing = pacing;
        self
    }
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompanionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("primary_model", &self.primary_model)
            .field("fallback_model", &self.fallback_model)
            .field("generation", &self.generation)
            .field("mode", &self.mode)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .field("pacing", &self.pacing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use calmchat::{ConversationMode, PacingRange};

    use super::{API_KEY_ENV, CONVERSATION_MODE_ENV, CompanionConfig, PRIMARY_MODEL_ENV};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_match_primary_and_fallback_models() {
        let config = CompanionConfig::from_lookup(lookup(&[]));

        assert!(!config.has_api_key());
        assert_eq!(config.primary_model, "gemini-2.0-flash-exp");
        assert_eq!(config.fallback_model, "gemini-pro");
        assert_eq!(config.mode, ConversationMode::Session);
        assert_eq!(config.timeout, Duration::from_secs(90));
        assert_eq!(config.pacing, PacingRange::from_millis(50, 100));
        assert_eq!(config.generation.top_k, Some(40));
    }

    #[test]
    fn lookup_values_are_trimmed_and_blank_values_ignored() {
        let config = CompanionConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "  AIza-key  "),
            (PRIMARY_MODEL_ENV, "   "),
            (CONVERSATION_MODE_ENV, " Stateless "),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("AIza-key"));
        assert_eq!(config.primary_model, "gemini-2.0-flash-exp");
        assert_eq!(config.mode, ConversationMode::Stateless);
    }

    #[test]
    fn unknown_mode_keeps_session_default() {
        let config = CompanionConfig::from_lookup(lookup(&[(CONVERSATION_MODE_ENV, "group")]));
        assert_eq!(config.mode, ConversationMode::Session);
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = CompanionConfig::new().with_api_key("AIza-secret");
        let rendered = format!("{config:?}");

        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("AIza-secret"));
    }
}
