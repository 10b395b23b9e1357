//! Screen capability trait
//!
//! A screen is one unit of UI content the host can load. The navigator holds a
//! screen only while it is on the stack; unloading (and with it, destruction)
//! belongs to the host.

use scene_platform::{LoadMode, SurfaceHandle, Viewport};
use scene_ui::transition::ScreenTransition;
use std::fmt;
use std::sync::Arc;

use crate::navigator::Navigator;
use crate::request::Payload;

/// Lifecycle hooks and properties of a screen
///
/// Every hook has an empty default. Hooks are called from the navigator's
/// runtime, never while navigator state is locked, so they may call back
/// into the [`Navigator`].
///
/// Hook order for one screen:
///
/// 1. `on_active` once its content is active and it is on the stack
/// 2. `on_shown` once it is fully visible
/// 3. `on_hidden` when it is covered by a full load or starts closing
/// 4. `on_refocus` whenever the screen above it closes
pub trait Screen: Send + Sync {
    /// Unique logical name
    fn name(&self) -> &str;

    /// Enter/exit animation, if the screen has one
    fn transition(&self) -> Option<&ScreenTransition> {
        None
    }

    /// Camera viewport, if the screen renders through one
    fn viewport(&self) -> Option<Viewport> {
        None
    }

    /// Whether the screen covers everything below it once shown
    fn is_full_screen(&self) -> bool {
        false
    }

    /// Content is active; `payload` is the data the caller navigated with
    fn on_active(&self, _payload: Option<Payload>) {}

    /// Fully visible and interactive
    fn on_shown(&self) {}

    /// About to be covered or removed
    fn on_hidden(&self) {}

    /// The screen above was closed and this one is on top again
    fn on_refocus(&self) {}

    /// Back key while this screen is on top; closes it by default
    fn on_key_back(&self, navigator: &Navigator) {
        navigator.close();
    }
}

/// Report from the host that a content unit finished loading
#[derive(Clone)]
pub struct ContentActivation {
    /// Surface the content renders to
    pub surface: SurfaceHandle,
    /// How the content was loaded
    pub mode: LoadMode,
    /// The screen the content unit created
    pub screen: Arc<dyn Screen>,
}

impl ContentActivation {
    /// Create an activation report
    pub fn new(screen: Arc<dyn Screen>, surface: SurfaceHandle, mode: LoadMode) -> Self {
        Self {
            surface,
            mode,
            screen,
        }
    }

    /// Name of the activated screen
    pub fn name(&self) -> &str {
        self.screen.name()
    }
}

impl fmt::Debug for ContentActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentActivation")
            .field("name", &self.screen.name())
            .field("surface", &self.surface)
            .field("mode", &self.mode)
            .finish()
    }
}
