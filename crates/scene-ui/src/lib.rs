//! Screen-level visuals for Scene Stack
//!
//! # Modules
//!
//! - [`tokens`] - Design tokens (durations, curves, sort layers, colors)
//! - [`visual`] - Animated visual state shared with the renderer
//! - [`transition`] - Per-screen enter/exit animations
//!
//! # Example
//!
//! ```rust
//! use scene_ui::transition::{ScreenTransition, TransitionKind, TransitionSpec};
//! use scene_ui::visual::Extent;
//!
//! let transition = ScreenTransition::with_default_ticker(
//!     TransitionSpec::new(TransitionKind::Fade),
//!     Extent::new(1280.0, 720.0),
//! );
//! transition.prepare_for_entry();
//! assert_eq!(transition.visual().get().opacity, 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod tokens;
pub mod transition;
pub mod visual;

pub use transition::{ScreenTransition, TransitionKind, TransitionPhase, TransitionSpec};
pub use visual::{Extent, Rgba, Vec2, VisualHandle, VisualState};
