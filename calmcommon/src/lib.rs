//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use calmcommon::{GenerationOptions, SessionId};
//!
//! let session = SessionId::from("session-1");
//! let options = GenerationOptions::conversation_defaults().enable_streaming();
//!
//! assert_eq!(session.as_str(), "session-1");
//! assert_eq!(options.top_k, Some(40));
//! assert!(options.stream);
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use calmcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Conversation identifier newtype.
    //!
    //! ```rust
    //! use calmcommon::SessionId;
    //!
    //! let fixed = SessionId::new("session-42");
    //! let generated = SessionId::generate();
    //!
    //! assert_eq!(fixed.to_string(), "session-42");
    //! assert_ne!(generated, fixed);
    //! ```

    use std::fmt::{Display, Formatter};

    /// Opaque handle for one logical conversation.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct SessionId(String);

    impl SessionId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn generate() -> Self {
            Self(format!("session-{}", uuid::Uuid::new_v4().simple()))
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod model {
    //! Shared generation settings used by request types.
    //!
    //! ```rust
    //! use calmcommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default()
    //!     .with_temperature(0.2)
    //!     .with_top_p(0.9)
    //!     .with_max_tokens(128)
    //!     .enable_streaming();
    //!
    //! assert_eq!(options.temperature, Some(0.2));
    //! assert_eq!(options.top_p, Some(0.9));
    //! assert_eq!(options.max_tokens, Some(128));
    //! assert!(options.stream);
    //! ```

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GenerationOptions {
        pub temperature: Option<f32>,
        pub top_k: Option<u32>,
        pub top_p: Option<f32>,
        pub max_tokens: Option<u32>,
        pub stream: bool,
    }

    impl GenerationOptions {
        /// Sampling settings used for every primary conversation request.
        pub fn conversation_defaults() -> Self {
            Self {
                temperature: Some(0.7),
                top_k: Some(40),
                top_p: Some(0.95),
                max_tokens: Some(2048),
                stream: false,
            }
        }

        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_top_k(mut self, top_k: u32) -> Self {
            self.top_k = Some(top_k);
            self
        }

        pub fn with_top_p(mut self, top_p: f32) -> Self {
            self.top_p = Some(top_p);
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = Some(max_tokens);
            self
        }

        pub fn with_streaming(mut self, stream: bool) -> Self {
            self.stream = stream;
            self
        }

        pub fn enable_streaming(self) -> Self {
            self.with_streaming(true)
        }
    }
}

pub use context::SessionId;
pub use future::BoxFuture;
pub use model::GenerationOptions;
