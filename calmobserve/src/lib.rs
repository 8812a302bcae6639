//! Production-friendly observability hooks for conversation sessions.
//!
//! ```rust
//! use calmobserve::{MetricsObservabilityHooks, SafeConversationHooks, TracingObservabilityHooks};
//!
//! let _tracing = SafeConversationHooks::new(TracingObservabilityHooks);
//! let _metrics = MetricsObservabilityHooks;
//! ```

mod fanout;
mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use fanout::FanoutConversationHooks;
pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::SafeConversationHooks;
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        FanoutConversationHooks, MetricsObservabilityHooks, SafeConversationHooks,
        TracingObservabilityHooks,
    };
}
