//! Value types exchanged with the host

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque id of a loaded content unit's render surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceHandle(pub u64);

impl SurfaceHandle {
    /// Raw id
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// How a content unit is brought in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadMode {
    /// Unload everything currently loaded, then load the target
    Replace,
    /// Load the target on top of what is already loaded
    Additive,
}

impl LoadMode {
    /// Whether this mode discards existing content
    pub fn is_replace(&self) -> bool {
        matches!(self, LoadMode::Replace)
    }
}

/// Camera viewport in normalized surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Viewport {
    /// Whether the viewport covers the whole surface
    pub fn is_full(&self) -> bool {
        self.x <= 0.0 && self.y <= 0.0 && self.width >= 1.0 && self.height >= 1.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}
