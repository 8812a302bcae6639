//! Typing delays for simulated incremental delivery.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use calmchat::{PacingRange, RandomizedPacer};
//!
//! let pacer = RandomizedPacer::seeded(PacingRange::default(), 7);
//! let delay = pacer.next_delay();
//!
//! assert!(delay >= Duration::from_millis(50));
//! assert!(delay < Duration::from_millis(100));
//! ```

use std::sync::Mutex;
use std::time::Duration;

use calmcommon::BoxFuture;
use futures_timer::Delay;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Half-open delay range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingRange {
    pub min: Duration,
    pub max: Duration,
}

impl PacingRange {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn from_millis(min: u64, max: u64) -> Self {
        Self::new(Duration::from_millis(min), Duration::from_millis(max))
    }
}

impl Default for PacingRange {
    fn default() -> Self {
        Self::from_millis(50, 100)
    }
}

pub trait TypingPacer: Send + Sync + std::fmt::Debug {
    /// Waits before the next simulated chunk.
    fn pause(&self) -> BoxFuture<'static, ()>;
}

#[derive(Debug)]
pub struct RandomizedPacer {
    range: PacingRange,
    rng: Mutex<StdRng>,
}

impl RandomizedPacer {
    pub fn new(range: PacingRange) -> Self {
        Self {
            range,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(range: PacingRange, seed: u64) -> Self {
        Self {
            range,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn range(&self) -> PacingRange {
        self.range
    }

    /// Draws a delay uniformly from the range. A degenerate range, or a
    /// poisoned generator, yields `min`.
    pub fn next_delay(&self) -> Duration {
        let min = self.range.min.as_micros() as u64;
        let max = self.range.max.as_micros() as u64;
        if min >= max {
            return self.range.min;
        }

        match self.rng.lock() {
            Ok(mut rng) => Duration::from_micros(rng.gen_range(min..max)),
            Err(_) => self.range.min,
        }
    }
}

impl Default for RandomizedPacer {
    fn default() -> Self {
        Self::new(PacingRange::default())
    }
}

impl TypingPacer for RandomizedPacer {
    fn pause(&self) -> BoxFuture<'static, ()> {
        let delay = self.next_delay();
        Box::pin(async move {
            Delay::new(delay).await;
        })
    }
}

/// Emits without waiting.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediatePacer;

impl TypingPacer for ImmediatePacer {
    fn pause(&self) -> BoxFuture<'static, ()> {
        Box::pin(async {})
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{ImmediatePacer, PacingRange, RandomizedPacer, TypingPacer};

    #[test]
    fn delays_stay_within_range() {
        let pacer = RandomizedPacer::seeded(PacingRange::from_millis(50, 100), 42);

        for _ in 0..200 {
            let delay = pacer.next_delay();
            assert!(delay >= Duration::from_millis(50), "{delay:?}");
            assert!(delay < Duration::from_millis(100), "{delay:?}");
        }
    }

    #[test]
    fn seeded_pacers_repeat_their_sequence() {
        let first = RandomizedPacer::seeded(PacingRange::default(), 9);
        let second = RandomizedPacer::seeded(PacingRange::default(), 9);

        let left = (0..5).map(|_| first.next_delay()).collect::<Vec<_>>();
        let right = (0..5).map(|_| second.next_delay()).collect::<Vec<_>>();
        assert_eq!(left, right);
    }

    #[test]
    fn degenerate_range_returns_min() {
        let pacer = RandomizedPacer::seeded(PacingRange::from_millis(80, 80), 1);
        assert_eq!(pacer.next_delay(), Duration::from_millis(80));
    }

    #[tokio::test]
    async fn randomized_pause_waits_at_least_min() {
        let pacer = RandomizedPacer::seeded(PacingRange::from_millis(5, 10), 3);
        let started = Instant::now();

        pacer.pause().await;

        assert!(started.elapsed() >= Duration::from_millis(5));
    }

    #[tokio::test]
    async fn immediate_pause_completes() {
        ImmediatePacer.pause().await;
    }
}
