//! Per-screen enter/exit transitions
//!
//! A [`ScreenTransition`] owns one [`AnimationDriver`] and one
//! [`VisualHandle`]. Entering moves the visual from the variant's hidden
//! extreme to rest; exiting moves it back. Starting one direction while the
//! other is in flight abandons the running animation and continues from
//! wherever the visual currently is.

use parking_lot::RwLock;
use scene_tween::{seconds, AnimationDriver, Curve, FrameTicker, RunOutcome, Ticker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::tokens;
use crate::visual::{Extent, VisualHandle, VisualState};

// =============================================================================
// Transition Types
// =============================================================================

/// Built-in transition variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionKind {
    /// No animation; the screen appears and disappears instantly
    None,
    /// Opacity 0 to 1
    Fade,
    /// Scale 0 to 1
    Scale,
    /// Slides down from above the surface
    SlideFromTop,
    /// Slides up from below the surface
    SlideFromBottom,
    /// Slides in from the left edge
    SlideFromLeft,
    /// Slides in from the right edge
    #[default]
    SlideFromRight,
}

/// What a transition is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransitionPhase {
    /// Not animating
    #[default]
    Idle,
    /// Running the enter animation
    Entering,
    /// Running the exit animation
    Exiting,
}

/// Transition configuration for one screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionSpec {
    /// Variant
    pub kind: TransitionKind,
    /// Curve used while entering
    pub enter_curve: Curve,
    /// Curve used while exiting
    pub exit_curve: Curve,
    /// Length of each direction in seconds
    pub duration_secs: f32,
}

impl TransitionSpec {
    /// Settings for a variant with default curves and duration
    pub fn new(kind: TransitionKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Override the duration
    pub fn with_duration(mut self, secs: f32) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Override both curves
    pub fn with_curves(mut self, enter: Curve, exit: Curve) -> Self {
        self.enter_curve = enter;
        self.exit_curve = exit;
        self
    }

    /// Duration of one direction
    pub fn duration(&self) -> Duration {
        seconds(self.duration_secs)
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            kind: TransitionKind::default(),
            enter_curve: tokens::easing::ENTER,
            exit_curve: tokens::easing::EXIT,
            duration_secs: tokens::duration::TRANSITION,
        }
    }
}

// =============================================================================
// Screen Transition
// =============================================================================

/// Enter/exit animator for a single screen
#[derive(Debug)]
pub struct ScreenTransition {
    spec: TransitionSpec,
    extent: RwLock<Extent>,
    phase: RwLock<TransitionPhase>,
    visual: VisualHandle,
    driver: AnimationDriver,
}

impl ScreenTransition {
    /// Create a transition drawing on a surface of `extent`, ticking on `ticker`
    pub fn new(spec: TransitionSpec, extent: Extent, ticker: Arc<dyn Ticker>) -> Self {
        Self {
            spec,
            extent: RwLock::new(extent),
            phase: RwLock::new(TransitionPhase::Idle),
            visual: VisualHandle::default(),
            driver: AnimationDriver::new(ticker),
        }
    }

    /// Create a transition on the default frame ticker
    pub fn with_default_ticker(spec: TransitionSpec, extent: Extent) -> Self {
        Self::new(spec, extent, Arc::new(FrameTicker::default()))
    }

    /// Configuration
    pub fn spec(&self) -> &TransitionSpec {
        &self.spec
    }

    /// Current phase
    pub fn phase(&self) -> TransitionPhase {
        *self.phase.read()
    }

    /// Visual state written by this transition
    pub fn visual(&self) -> &VisualHandle {
        &self.visual
    }

    /// Update the surface size used for slide distances
    pub fn set_extent(&self, extent: Extent) {
        *self.extent.write() = extent;
    }

    /// Place the visual at the pre-enter extreme, before the screen is first shown
    pub fn prepare_for_entry(&self) {
        if self.spec.kind == TransitionKind::None {
            return;
        }
        self.driver.abandon();
        let current = self.visual.get();
        self.visual.set(self.hidden_from(current));
        *self.phase.write() = TransitionPhase::Idle;
    }

    /// Jump straight to the resting state without animating
    pub fn finish_enter(&self) {
        self.driver.abandon();
        if self.spec.kind != TransitionKind::None {
            let current = self.visual.get();
            self.visual.set(self.rest_from(current));
        }
        *self.phase.write() = TransitionPhase::Idle;
    }

    /// Animate from the hidden extreme (or the current visual) to rest
    pub async fn enter(&self) -> RunOutcome {
        self.play(TransitionPhase::Entering).await
    }

    /// Animate from rest (or the current visual) to the hidden extreme
    pub async fn exit(&self) -> RunOutcome {
        self.play(TransitionPhase::Exiting).await
    }

    async fn play(&self, direction: TransitionPhase) -> RunOutcome {
        if self.spec.kind == TransitionKind::None {
            self.driver.abandon();
            *self.phase.write() = TransitionPhase::Idle;
            return RunOutcome::Completed;
        }

        let (from, to) = self.begin(direction);
        let curve = match direction {
            TransitionPhase::Exiting => self.spec.exit_curve,
            _ => self.spec.enter_curve,
        };

        tracing::trace!("{:?} transition {:?}", self.spec.kind, direction);

        let visual = self.visual.clone();
        let outcome = self
            .driver
            .run(self.spec.duration(), |progress| {
                visual.set(VisualState::ease(&from, &to, curve, progress));
            })
            .await;

        if outcome.is_completed() {
            self.visual.set(to);
            let mut phase = self.phase.write();
            if *phase == direction {
                *phase = TransitionPhase::Idle;
            }
        }

        outcome
    }

    /// Switch phase and pick the (start, end) visual pair for `direction`
    ///
    /// When the opposite direction is still running, the start is the current
    /// visual snapshot instead of the nominal extreme.
    pub(crate) fn begin(&self, direction: TransitionPhase) -> (VisualState, VisualState) {
        let previous = std::mem::replace(&mut *self.phase.write(), direction);
        let current = self.visual.get();
        let reversing = previous != TransitionPhase::Idle && previous != direction;

        let (nominal_from, to) = match direction {
            TransitionPhase::Exiting => (self.rest_from(current), self.hidden_from(current)),
            _ => (self.hidden_from(current), self.rest_from(current)),
        };

        let from = if reversing { current } else { nominal_from };
        (from, to)
    }

    fn rest_from(&self, current: VisualState) -> VisualState {
        let mut state = current;
        match self.spec.kind {
            TransitionKind::None => {}
            TransitionKind::Fade => state.opacity = 1.0,
            TransitionKind::Scale => state.scale = 1.0,
            TransitionKind::SlideFromLeft | TransitionKind::SlideFromRight => state.offset.x = 0.0,
            TransitionKind::SlideFromTop | TransitionKind::SlideFromBottom => state.offset.y = 0.0,
        }
        state
    }

    fn hidden_from(&self, current: VisualState) -> VisualState {
        let extent = *self.extent.read();
        let mut state = current;
        match self.spec.kind {
            TransitionKind::None => {}
            TransitionKind::Fade => state.opacity = 0.0,
            TransitionKind::Scale => state.scale = 0.0,
            TransitionKind::SlideFromLeft => state.offset.x = -extent.width,
            TransitionKind::SlideFromRight => state.offset.x = extent.width,
            TransitionKind::SlideFromTop => state.offset.y = extent.height,
            TransitionKind::SlideFromBottom => state.offset.y = -extent.height,
        }
        state
    }
}
