//! Content host trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{LoadMode, SurfaceHandle};

/// Loads, unloads and arranges content units on behalf of the navigator
///
/// `load_content` resolves once the host has accepted the request. The
/// loaded unit is reported back separately through
/// `Navigator::on_content_activated`, which may happen before or after the
/// returned future completes.
///
/// Implementations must be cheap to call from the navigator's runtime;
/// `set_visible` and `set_sort_order` are synchronous and must not block.
#[async_trait]
pub trait ContentHost: Send + Sync {
    /// Load the content unit called `name`
    async fn load_content(&self, name: &str, mode: LoadMode) -> Result<()>;

    /// Unload the content unit rendering to `surface`
    async fn unload_content(&self, surface: SurfaceHandle) -> Result<()>;

    /// Show or hide a surface without unloading it
    fn set_visible(&self, surface: SurfaceHandle, visible: bool);

    /// Set the render order of a surface (higher draws on top)
    fn set_sort_order(&self, surface: SurfaceHandle, order: i32);
}
