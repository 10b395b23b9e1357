//! Shared navigation state for Scene Stack
//!
//! This crate holds the input shield: the single state machine that decides
//! whether navigation may start and whether user input reaches the screens.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod shield;

pub use shield::{ShieldConfig, ShieldController, ShieldEvent, ShieldState};
