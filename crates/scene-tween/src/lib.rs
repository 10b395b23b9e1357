//! Scene Tween
//!
//! Time-based animation primitives shared by the shield fade and per-screen
//! transitions:
//!
//! - [`curve`]: the 32 named easing curves
//! - [`driver`]: a cooperative progress runner with abandonment
//! - [`ticker`]: the per-frame suspension primitive the driver waits on

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod curve;
pub mod driver;
pub mod ticker;

pub use curve::{ease, ease_named, Curve};
pub use driver::{seconds, AnimationDriver, RunOutcome};
pub use ticker::{FrameTicker, Ticker, DEFAULT_FRAME_RATE};
