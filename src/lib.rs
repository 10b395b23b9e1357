//! Scene Stack
//!
//! Stack-based screen navigation with animated transitions and an
//! input-blocking shield. This crate re-exports the workspace crates:
//!
//! - [`tween`] - Easing curves, the animation driver and frame ticks
//! - [`ui`] - Design tokens, visual state and per-screen transitions
//! - [`platform`] - The host interface the navigator drives
//! - [`state`] - The input shield state machine
//! - [`navigation`] - The navigator itself
//!
//! # Example
//!
//! ```no_run
//! use scene_stack::{init_tracing, Navigator, NavigatorConfig};
//! # use scene_stack::platform::ContentHost;
//! # use std::sync::Arc;
//!
//! # async fn run(host: Arc<dyn ContentHost>) -> scene_stack::navigation::Result<()> {
//! init_tracing();
//!
//! let navigator = Navigator::new(NavigatorConfig::default(), host);
//! navigator.load_async("Title", None).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use scene_core as navigation;
pub use scene_platform as platform;
pub use scene_state as state;
pub use scene_tween as tween;
pub use scene_ui as ui;

pub use scene_core::{
    ContentActivation, NavigationError, Navigator, NavigatorConfig, Payload, Screen,
};
pub use scene_platform::{ContentHost, LoadMode, PlatformError, SurfaceHandle};
pub use scene_state::ShieldState;
pub use scene_ui::transition::{ScreenTransition, TransitionKind, TransitionSpec};

use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "scene_stack=info,scene_core=info";

/// Install a formatted `tracing` subscriber filtered by `RUST_LOG`
///
/// Safe to call more than once; only the first call installs anything.
/// Returns whether this call installed the subscriber.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Tracing initialized");
    }
    installed
}
