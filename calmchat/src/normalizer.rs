//! Provider event streams to cumulative text chunks.
//!
//! ```rust
//! use calmchat::normalize_stream;
//! use calmprovider::VecEventStream;
//! use futures_util::StreamExt;
//!
//! let runtime = tokio::runtime::Runtime::new().expect("runtime");
//! let events = Box::pin(VecEventStream::text_deltas(["Hel", "lo"]));
//! let chunks = runtime.block_on(normalize_stream(events).collect::<Vec<_>>());
//!
//! let texts = chunks
//!     .into_iter()
//!     .map(|chunk| chunk.expect("chunk").text)
//!     .collect::<Vec<_>>();
//! assert_eq!(texts, vec!["Hel", "Hello"]);
//! ```

use std::pin::Pin;

use async_stream::try_stream;
use calmprovider::{BoxedEventStream, Message, ProviderError, Role, StreamEvent};
use futures_core::Stream;
use futures_util::StreamExt;

use crate::Chunk;

pub type NormalizedStream<'a> =
    Pin<Box<dyn Stream<Item = Result<Chunk, ProviderError>> + Send + 'a>>;

/// Accumulates text deltas and yields the running total after each one.
///
/// Provider errors pass through unchanged and end the sequence. A terminal
/// message is only used when the provider sent no deltas at all.
pub fn normalize_stream<'a>(events: BoxedEventStream<'a>) -> NormalizedStream<'a> {
    Box::pin(try_stream! {
        let mut events = events;
        let mut text = String::new();

        while let Some(event) = events.next().await {
            let terminal = match event? {
                StreamEvent::TextDelta(delta) => {
                    if delta.is_empty() {
                        continue;
                    }

                    text.push_str(&delta);
                    yield Chunk::new(text.clone());
                    continue;
                }
                StreamEvent::MessageComplete(message) => message,
                StreamEvent::ResponseComplete(response) => response.message,
            };

            if let Some(full) = terminal_text(&text, terminal) {
                text = full;
                yield Chunk::new(text.clone());
            }
        }
    })
}

fn terminal_text(seen: &str, message: Message) -> Option<String> {
    if !seen.is_empty() || message.role != Role::Assistant || message.content.is_empty() {
        return None;
    }

    Some(message.content)
}
