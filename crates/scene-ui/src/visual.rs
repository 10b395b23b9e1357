//! Visual state shared between an animation and the renderer
//!
//! Transitions write into a [`VisualHandle`]; the host reads it when drawing.
//! Only the properties a transition animates are ever touched.

use parking_lot::RwLock;
use scene_tween::Curve;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 2D offset from a screen's resting position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal offset, positive to the right
    pub x: f32,
    /// Vertical offset, positive upwards
    pub y: f32,
}

impl Vec2 {
    /// Origin
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Create a vector
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size of the surface a screen is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Width in surface units
    pub width: f32,
    /// Height in surface units
    pub height: f32,
}

impl Extent {
    /// Create an extent
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

/// RGBA color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Rgba {
    /// Opaque black
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    /// Create a color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Animated properties of a screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    /// Offset from the resting position
    pub offset: Vec2,
    /// Uniform scale, 1.0 at rest
    pub scale: f32,
    /// Opacity, 1.0 at rest
    pub opacity: f32,
}

impl VisualState {
    /// Resting state: no offset, full size, fully opaque
    pub const REST: VisualState = VisualState {
        offset: Vec2::ZERO,
        scale: 1.0,
        opacity: 1.0,
    };

    /// Interpolate every property between `from` and `to`
    ///
    /// Properties equal in both states stay exactly unchanged.
    pub fn ease(from: &VisualState, to: &VisualState, curve: Curve, progress: f32) -> VisualState {
        VisualState {
            offset: Vec2::new(
                curve.ease(from.offset.x, to.offset.x, progress),
                curve.ease(from.offset.y, to.offset.y, progress),
            ),
            scale: curve.ease(from.scale, to.scale, progress),
            opacity: curve.ease(from.opacity, to.opacity, progress),
        }
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::REST
    }
}

/// Shared, lock-guarded visual state
#[derive(Debug, Clone, Default)]
pub struct VisualHandle {
    inner: Arc<RwLock<VisualState>>,
}

impl VisualHandle {
    /// Create a handle starting at `state`
    pub fn new(state: VisualState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Current state
    pub fn get(&self) -> VisualState {
        *self.inner.read()
    }

    /// Replace the state
    pub fn set(&self, state: VisualState) {
        *self.inner.write() = state;
    }

    /// Modify the state in place
    pub fn update(&self, f: impl FnOnce(&mut VisualState)) {
        f(&mut self.inner.write());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_state() {
        let state = VisualState::default();
        assert_eq!(state.offset, Vec2::ZERO);
        assert_eq!(state.scale, 1.0);
        assert_eq!(state.opacity, 1.0);
    }

    #[test]
    fn test_ease_leaves_unchanged_properties() {
        let from = VisualState {
            offset: Vec2::new(100.0, 25.0),
            ..VisualState::REST
        };
        let to = VisualState {
            offset: Vec2::new(0.0, 25.0),
            ..VisualState::REST
        };

        let mid = VisualState::ease(&from, &to, Curve::EaseOutBack, 0.4);
        assert_eq!(mid.offset.y, 25.0);
        assert_eq!(mid.scale, 1.0);
        assert_eq!(mid.opacity, 1.0);
        assert_ne!(mid.offset.x, 100.0);
    }

    #[test]
    fn test_handle_shares_state() {
        let handle = VisualHandle::default();
        let other = handle.clone();

        other.update(|s| s.opacity = 0.25);
        assert_eq!(handle.get().opacity, 0.25);

        handle.set(VisualState::REST);
        assert_eq!(other.get(), VisualState::REST);
    }

    #[test]
    fn test_rgba_with_alpha() {
        let clear = Rgba::BLACK.with_alpha(0.0);
        assert_eq!(clear, Rgba::new(0.0, 0.0, 0.0, 0.0));
    }
}
