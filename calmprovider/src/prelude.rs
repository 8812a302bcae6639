//! Common `calmprovider` imports for downstream crates.

pub use crate::{
    BoxedEventStream, Message, ModelEventStream, ModelProvider, ModelRequest, ModelRequestBuilder,
    ModelResponse, ProviderError, ProviderErrorKind, ProviderFuture, ProviderId, Role,
    SecretString, SecureCredentialManager, StopReason, StreamEvent, TokenUsage, VecEventStream,
};
pub use calmcommon::{BoxFuture, GenerationOptions};
