use crate::{BoxedEventStream, ModelRequest, ModelResponse, ProviderError, ProviderId};

pub type ProviderFuture<'a, T> = calmcommon::BoxFuture<'a, T>;

/// A hosted model reachable through one-shot and streamed completions.
pub trait ModelProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>>;

    /// Starts a streamed completion. An `Err` here means the request never
    /// started; errors yielded by the returned stream happened mid-flight.
    fn stream<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>>;
}
