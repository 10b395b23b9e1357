//! Input shield and full-screen fade
//!
//! The shield is a full-surface overlay that swallows input while a
//! navigation is in progress. It doubles as the fade-to-color used when the
//! whole scene is replaced.
//!
//! | From        | Call               | To                      |
//! |-------------|--------------------|-------------------------|
//! | Off         | `shield_on`        | On                      |
//! | On          | `shield_off`       | Off                     |
//! | Off         | `fade_out_scene`   | FadingOut, then Loading |
//! | Off/Loading | `fade_in_scene`    | FadingIn, then Off      |
//!
//! `shield_on` and `shield_off` outside their source state are ignored.
//! Starting a fade while another fade is running is a caller error.

use parking_lot::Mutex;
use scene_tween::{seconds, AnimationDriver, Curve, FrameTicker, RunOutcome, Ticker};
use scene_ui::tokens;
use scene_ui::visual::Rgba;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};

/// Shield state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShieldState {
    /// Input passes through, overlay clear
    #[default]
    Off,
    /// Input blocked, overlay clear
    On,
    /// Overlay fading from opaque to clear
    FadingIn,
    /// Overlay fading from clear to opaque
    FadingOut,
    /// Overlay opaque, waiting for new content
    Loading,
}

impl ShieldState {
    /// Whether a fade animation is running
    pub fn is_fading(&self) -> bool {
        matches!(self, ShieldState::FadingIn | ShieldState::FadingOut)
    }
}

impl std::fmt::Display for ShieldState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShieldState::Off => "off",
            ShieldState::On => "on",
            ShieldState::FadingIn => "fading-in",
            ShieldState::FadingOut => "fading-out",
            ShieldState::Loading => "loading",
        };
        f.write_str(name)
    }
}

/// Shield appearance and timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShieldConfig {
    /// Length of each fade in seconds; zero makes fades instantaneous
    pub fade_duration_secs: f32,
    /// Curve for the opaque-to-clear fade
    pub fade_in_curve: Curve,
    /// Curve for the clear-to-opaque fade
    pub fade_out_curve: Curve,
    /// Overlay color at full opacity
    pub color: Rgba,
}

impl ShieldConfig {
    /// Fade duration
    pub fn fade_duration(&self) -> Duration {
        seconds(self.fade_duration_secs)
    }
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            fade_duration_secs: tokens::duration::FADE,
            fade_in_curve: tokens::easing::FADE_IN,
            fade_out_curve: tokens::easing::FADE_OUT,
            color: tokens::color::SHIELD,
        }
    }
}

/// Events broadcast by the shield
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShieldEvent {
    /// State moved between two values
    StateChanged {
        /// Previous state
        from: ShieldState,
        /// New state
        to: ShieldState,
    },
    /// Shield forced back to Off (e.g. on teardown)
    Reset,
}

#[derive(Debug)]
struct ShieldInner {
    state: ShieldState,
    blocked: bool,
    overlay_alpha: f32,
}

/// Handle to the shield state machine
///
/// Clones share one shield.
///
/// # Example
///
/// ```no_run
/// use scene_state::shield::{ShieldController, ShieldConfig, ShieldState};
///
/// #[tokio::main]
/// async fn main() {
///     let shield = ShieldController::with_default_ticker(ShieldConfig::default());
///
///     let fade = shield.fade_out_scene();
///     assert!(shield.is_blocked());
///     fade.await;
///
///     assert_eq!(shield.state(), ShieldState::Loading);
/// }
/// ```
#[derive(Clone)]
pub struct ShieldController {
    config: ShieldConfig,
    inner: Arc<Mutex<ShieldInner>>,
    driver: AnimationDriver,
    state_tx: Arc<watch::Sender<ShieldState>>,
    events_tx: broadcast::Sender<ShieldEvent>,
}

impl ShieldController {
    /// Create a shield ticking on `ticker`
    pub fn new(config: ShieldConfig, ticker: Arc<dyn Ticker>) -> Self {
        let (state_tx, _) = watch::channel(ShieldState::Off);
        let (events_tx, _) = broadcast::channel(32);

        Self {
            config,
            inner: Arc::new(Mutex::new(ShieldInner {
                state: ShieldState::Off,
                blocked: false,
                overlay_alpha: 0.0,
            })),
            driver: AnimationDriver::new(ticker),
            state_tx: Arc::new(state_tx),
            events_tx,
        }
    }

    /// Create a shield on the default frame ticker
    pub fn with_default_ticker(config: ShieldConfig) -> Self {
        Self::new(config, Arc::new(FrameTicker::default()))
    }

    /// Configuration
    pub fn config(&self) -> &ShieldConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> ShieldState {
        self.inner.lock().state
    }

    /// Whether input is currently blocked
    pub fn is_blocked(&self) -> bool {
        self.inner.lock().blocked
    }

    /// Overlay color with its current opacity applied
    pub fn overlay(&self) -> Rgba {
        let alpha = self.inner.lock().overlay_alpha;
        self.config.color.with_alpha(self.config.color.a * alpha)
    }

    /// Subscribe to the latest state
    pub fn subscribe(&self) -> watch::Receiver<ShieldState> {
        self.state_tx.subscribe()
    }

    /// Subscribe to state change events
    pub fn subscribe_events(&self) -> broadcast::Receiver<ShieldEvent> {
        self.events_tx.subscribe()
    }

    /// Block input instantly, leaving the overlay clear
    ///
    /// Returns `false` (and does nothing) unless the shield is Off.
    pub fn shield_on(&self) -> bool {
        self.transition_from(ShieldState::Off, ShieldState::On, true, 0.0)
    }

    /// Unblock input instantly
    ///
    /// Returns `false` (and does nothing) unless the shield is On.
    pub fn shield_off(&self) -> bool {
        self.transition_from(ShieldState::On, ShieldState::Off, false, 0.0)
    }

    /// Fade the overlay to opaque, then hold in Loading
    ///
    /// Input is blocked and the state is FadingOut as soon as this is called,
    /// before the returned future is first polled. With a zero fade duration
    /// the shield goes straight to Loading.
    pub fn fade_out_scene(&self) -> impl Future<Output = RunOutcome> + Send + 'static {
        let duration = self.config.fade_duration();
        if duration.is_zero() {
            self.set(ShieldState::Loading, true, 1.0);
        } else {
            self.set(ShieldState::FadingOut, true, 0.0);
        }

        let this = self.clone();
        async move {
            let curve = this.config.fade_out_curve;
            let inner = Arc::clone(&this.inner);
            let outcome = this
                .driver
                .run(duration, |progress| {
                    inner.lock().overlay_alpha = curve.ease(0.0, 1.0, progress);
                })
                .await;

            if outcome.is_completed() {
                this.transition_from(ShieldState::FadingOut, ShieldState::Loading, true, 1.0);
            }
            outcome
        }
    }

    /// Fade the overlay from opaque to clear, then unblock input
    ///
    /// The state is FadingIn as soon as this is called. With a zero fade
    /// duration the shield goes straight to Off.
    pub fn fade_in_scene(&self) -> impl Future<Output = RunOutcome> + Send + 'static {
        let duration = self.config.fade_duration();
        if duration.is_zero() {
            self.set(ShieldState::Off, false, 0.0);
        } else {
            self.set(ShieldState::FadingIn, true, 1.0);
        }

        let this = self.clone();
        async move {
            let curve = this.config.fade_in_curve;
            let inner = Arc::clone(&this.inner);
            let outcome = this
                .driver
                .run(duration, |progress| {
                    inner.lock().overlay_alpha = curve.ease(1.0, 0.0, progress);
                })
                .await;

            if outcome.is_completed() {
                this.transition_from(ShieldState::FadingIn, ShieldState::Off, false, 0.0);
            }
            outcome
        }
    }

    /// Abandon any fade and return to Off with input unblocked
    pub fn reset(&self) {
        self.driver.abandon();
        self.set(ShieldState::Off, false, 0.0);
        let _ = self.events_tx.send(ShieldEvent::Reset);
    }

    fn transition_from(
        &self,
        expected: ShieldState,
        to: ShieldState,
        blocked: bool,
        overlay_alpha: f32,
    ) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != expected {
            tracing::debug!(
                "Shield ignoring {} -> {} while {}",
                expected,
                to,
                inner.state
            );
            return false;
        }
        inner.state = to;
        inner.blocked = blocked;
        inner.overlay_alpha = overlay_alpha;
        drop(inner);

        self.notify(expected, to);
        true
    }

    fn set(&self, to: ShieldState, blocked: bool, overlay_alpha: f32) {
        let mut inner = self.inner.lock();
        let from = std::mem::replace(&mut inner.state, to);
        inner.blocked = blocked;
        inner.overlay_alpha = overlay_alpha;
        drop(inner);

        if from != to {
            self.notify(from, to);
        }
    }

    fn notify(&self, from: ShieldState, to: ShieldState) {
        tracing::debug!("Shield {} -> {}", from, to);
        let _ = self.state_tx.send(to);
        let _ = self.events_tx.send(ShieldEvent::StateChanged { from, to });
    }
}

impl std::fmt::Debug for ShieldController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ShieldController")
            .field("state", &inner.state)
            .field("blocked", &inner.blocked)
            .field("overlay_alpha", &inner.overlay_alpha)
            .finish()
    }
}
