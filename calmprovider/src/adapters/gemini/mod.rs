//! Google Gemini adapter over the Generative Language REST API.

mod auth;
mod provider;
mod serde_api;
mod transport;
mod types;

pub use provider::GeminiProvider;
pub use transport::{GEMINI_BASE_URL, GeminiChunkStream, GeminiHttpTransport, GeminiTransport};
pub use types::{
    GeminiContent, GeminiFinishReason, GeminiGenerationConfig, GeminiRequest, GeminiResponse,
    GeminiRole, GeminiStreamChunk, GeminiUsage,
};
