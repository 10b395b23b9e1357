//! Navigation core for Scene Stack
//!
//! This crate ties the shield, the transitions and the host together:
//!
//! - [`navigator`] - The orchestrator: load, add, close, activation handling
//! - [`screen`] - The screen capability trait and activation reports
//! - [`stack`] - The ordered stack of active screens
//! - [`request`] - Pending navigation requests and their queue
//! - [`config`] - Navigator configuration
//! - [`error`] - Navigation errors
//!
//! The `test-utils` feature adds a scripted host and recording screens for
//! end-to-end tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod navigator;
pub mod request;
pub mod screen;
pub mod stack;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ConfigError, NavigatorConfig};
pub use error::{NavigationError, Result};
pub use navigator::Navigator;
pub use request::{Callback, NavigationRequest, Payload, RequestQueue};
pub use screen::{ContentActivation, Screen};
pub use stack::{StackEntry, ViewStack};
