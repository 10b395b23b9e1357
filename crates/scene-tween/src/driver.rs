//! Time-stepped progress runner
//!
//! The driver knows nothing about what it animates. It advances a progress
//! value from 0 to 1 over a duration, once per frame, and hands each value to a
//! callback. Both the shield fade and per-screen transitions run on it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::ticker::{FrameTicker, Ticker};

/// Largest progress reported before a run completes
const IN_FLIGHT_MAX: f32 = 1.0 - f32::EPSILON;

/// How an animation run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Reached progress 1.0 (or had nothing to animate)
    Completed,
    /// Stopped early by [`AnimationDriver::abandon`] or a newer run
    Abandoned,
}

impl RunOutcome {
    /// Whether the run reached its end state
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }
}

/// Convert a duration in seconds, treating zero, negative and NaN as "no animation"
pub fn seconds(secs: f32) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f32(secs)
    } else {
        Duration::ZERO
    }
}

/// Cooperative animation runner
///
/// Clones share the same run slot: starting a run on any clone abandons the
/// run in flight on the others.
///
/// # Example
///
/// ```no_run
/// use scene_tween::{AnimationDriver, FrameTicker};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let driver = AnimationDriver::new(Arc::new(FrameTicker::default()));
///     let outcome = driver
///         .run(Duration::from_millis(300), |progress| println!("{progress}"))
///         .await;
///     assert!(outcome.is_completed());
/// }
/// ```
#[derive(Clone)]
pub struct AnimationDriver {
    ticker: Arc<dyn Ticker>,
    generation: Arc<AtomicU64>,
}

impl AnimationDriver {
    /// Create a driver ticking on the given frame source
    pub fn new(ticker: Arc<dyn Ticker>) -> Self {
        Self {
            ticker,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run from 0 to 1 over `duration`, calling `on_progress` once per frame
    ///
    /// A zero duration completes immediately without calling `on_progress`.
    /// A completed run always ends with exactly one call of `1.0`. An
    /// abandoned run makes no final call; callers that need a defined end
    /// state apply it themselves.
    pub async fn run<F>(&self, duration: Duration, mut on_progress: F) -> RunOutcome
    where
        F: FnMut(f32) + Send,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if duration.is_zero() {
            return RunOutcome::Completed;
        }

        let total = duration.as_secs_f32();
        let started = Instant::now();

        loop {
            let elapsed = started.elapsed();
            if elapsed >= duration {
                break;
            }

            // Only the final call may report 1.0, even when f32 rounds up.
            let progress = (elapsed.as_secs_f32() / total).clamp(0.0, IN_FLIGHT_MAX);
            on_progress(progress);

            self.ticker.next_frame().await;

            if self.generation.load(Ordering::SeqCst) != generation {
                tracing::trace!("Animation run {} abandoned", generation);
                return RunOutcome::Abandoned;
            }
        }

        on_progress(1.0);
        RunOutcome::Completed
    }

    /// Stop the run in flight before its next frame
    pub fn abandon(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(Arc::new(FrameTicker::default()))
    }
}

impl std::fmt::Debug for AnimationDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationDriver")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}
