//! Design tokens for scene transitions
//!
//! Durations, curves, frame pacing and layering constants used as defaults by
//! the shield and by per-screen transitions.

use crate::visual::Rgba;

// =============================================================================
// Duration Tokens
// =============================================================================

/// Animation durations in seconds
pub mod duration {
    /// No animation
    pub const INSTANT: f32 = 0.0;
    /// Full-screen shield fade (150ms)
    pub const FADE: f32 = 0.15;
    /// Screen enter/exit transition (300ms)
    pub const TRANSITION: f32 = 0.3;
}

// =============================================================================
// Easing Tokens
// =============================================================================

/// Default curves
pub mod easing {
    use scene_tween::Curve;

    /// Shield fade from clear to opaque
    pub const FADE_OUT: Curve = Curve::EaseInOutExpo;
    /// Shield fade from opaque to clear
    pub const FADE_IN: Curve = Curve::EaseInOutExpo;
    /// Screen entering
    pub const ENTER: Curve = Curve::EaseInOutExpo;
    /// Screen exiting
    pub const EXIT: Curve = Curve::EaseInOutExpo;
}

// =============================================================================
// Frame Tokens
// =============================================================================

/// Frame pacing
pub mod frame {
    /// Frames per second for the built-in ticker
    pub const RATE: u32 = scene_tween::DEFAULT_FRAME_RATE;
}

// =============================================================================
// Sort Order Tokens
// =============================================================================

/// Render ordering layers
pub mod sort_order {
    /// Bottom (main) screen
    pub const BASE: i32 = 0;
    /// Loading indicator, above every stacked screen
    pub const LOADING: i32 = 98;

    /// Sort order for a screen that sits at `depth` (1-based) in the stack
    pub fn for_depth(depth: usize) -> i32 {
        let layer = i32::try_from(depth.saturating_sub(1)).unwrap_or(i32::MAX);
        BASE.saturating_add(layer)
    }
}

// =============================================================================
// Color Tokens
// =============================================================================

/// Colors
pub mod color {
    use super::Rgba;

    /// Shield overlay color (opaque black)
    pub const SHIELD: Rgba = Rgba::BLACK;
}
