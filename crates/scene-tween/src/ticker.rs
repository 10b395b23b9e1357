//! Frame scheduling
//!
//! A [`Ticker`] is the host's "resume me on the next frame" primitive. Animation
//! runs suspend on it once per step.

use async_trait::async_trait;
use std::time::Duration;

/// Default frame rate for the built-in ticker
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Source of frame ticks
#[async_trait]
pub trait Ticker: Send + Sync {
    /// Suspend until the next frame
    async fn next_frame(&self);
}

/// Ticker that sleeps for one frame period on the tokio timer
///
/// Under a paused tokio clock (`start_paused = true`) every frame advances
/// virtual time deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicker {
    frame: Duration,
}

impl FrameTicker {
    /// Create a ticker for the given frame rate (a zero rate is treated as 1 fps)
    pub fn new(frame_rate: u32) -> Self {
        let rate = frame_rate.max(1);
        Self {
            frame: Duration::from_secs_f64(1.0 / f64::from(rate)),
        }
    }

    /// Length of one frame
    pub fn frame_duration(&self) -> Duration {
        self.frame
    }
}

impl Default for FrameTicker {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

#[async_trait]
impl Ticker for FrameTicker {
    async fn next_frame(&self) {
        tokio::time::sleep(self.frame).await;
    }
}
