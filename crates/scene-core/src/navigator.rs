//! Navigation orchestrator
//!
//! The [`Navigator`] owns the view stack, the pending request queue and the
//! input shield. It sequences full-scene loads as
//! "fade out, hide, replace, activate, fade in, shown" and overlay pushes as
//! "block, load, activate, enter, shown, unblock".
//!
//! Entry points come in two flavors. The `*_async` methods return a future
//! that resolves when the navigation has finished; the plain methods spawn
//! that future on the current tokio runtime. In both cases the synchronous
//! part of the call (shield changes, rejection checks, queueing) happens
//! before the method returns.

use parking_lot::Mutex;
use scene_platform::{ContentHost, LoadMode, PlatformError, SurfaceHandle};
use scene_state::{ShieldController, ShieldState};
use scene_tween::{RunOutcome, Ticker};
use scene_ui::tokens;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use uuid::Uuid;

use crate::config::NavigatorConfig;
use crate::error::{NavigationError, Result};
use crate::request::{Callback, NavigationRequest, Payload, RequestQueue};
use crate::screen::{ContentActivation, Screen};
use crate::stack::{StackEntry, ViewStack};

// =============================================================================
// State
// =============================================================================

#[derive(Default)]
struct LoadingIndicator {
    name: Option<String>,
    surface: Option<SurfaceHandle>,
    screen: Option<Arc<dyn Screen>>,
    active: bool,
}

#[derive(Default)]
struct NavigatorState {
    stack: ViewStack,
    queue: RequestQueue,
    pending_target: Option<String>,
    main_screen: Option<String>,
    loading: LoadingIndicator,
}

struct NavigatorInner {
    config: NavigatorConfig,
    host: Arc<dyn ContentHost>,
    shield: ShieldController,
    state: Mutex<NavigatorState>,
}

/// Snapshot of the screen being closed, taken when `close` is called
struct Closing {
    key: Uuid,
    name: String,
    screen: Arc<dyn Screen>,
    surface: SurfaceHandle,
}

// =============================================================================
// Navigator
// =============================================================================

/// Stack-based navigation orchestrator
///
/// Cheap to clone; clones share the same stack, queue and shield.
///
/// # Example
///
/// ```no_run
/// use scene_core::{Navigator, NavigatorConfig};
/// # use scene_platform::ContentHost;
/// # use std::sync::Arc;
///
/// # async fn run(host: Arc<dyn ContentHost>) -> scene_core::Result<()> {
/// let navigator = Navigator::new(NavigatorConfig::default(), host);
///
/// // Replace everything with the main menu and wait until it is shown
/// navigator.load_async("MainMenu", None).await?;
///
/// // Push a dialog on top
/// navigator.add_async("Settings", None, None, None).await?;
/// assert_eq!(navigator.depth(), 2);
///
/// navigator.close_async().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<NavigatorInner>,
}

impl Navigator {
    /// Create a navigator ticking at the configured frame rate
    pub fn new(config: NavigatorConfig, host: Arc<dyn ContentHost>) -> Self {
        let ticker = config.ticker();
        Self::with_ticker(config, host, ticker)
    }

    /// Create a navigator from a JSON config file
    pub async fn from_config_file(
        path: impl AsRef<Path>,
        host: Arc<dyn ContentHost>,
    ) -> Result<Self> {
        let config = NavigatorConfig::from_file(path).await?;
        Ok(Self::new(config, host))
    }

    /// Create a navigator whose shield ticks on `ticker`
    pub fn with_ticker(
        config: NavigatorConfig,
        host: Arc<dyn ContentHost>,
        ticker: Arc<dyn Ticker>,
    ) -> Self {
        let shield = ShieldController::new(config.shield_config(), ticker);
        let state = NavigatorState {
            loading: LoadingIndicator {
                name: config.loading_screen.clone(),
                ..LoadingIndicator::default()
            },
            ..NavigatorState::default()
        };

        Self {
            inner: Arc::new(NavigatorInner {
                config,
                host,
                shield,
                state: Mutex::new(state),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Configuration
    pub fn config(&self) -> &NavigatorConfig {
        &self.inner.config
    }

    /// The shield
    pub fn shield(&self) -> &ShieldController {
        &self.inner.shield
    }

    /// Current shield state
    pub fn shield_state(&self) -> ShieldState {
        self.inner.shield.state()
    }

    /// Subscribe to shield state changes
    pub fn subscribe_shield(&self) -> watch::Receiver<ShieldState> {
        self.inner.shield.subscribe()
    }

    /// Whether a full-scene load may start (false while a fade is running)
    pub fn can_navigate(&self) -> bool {
        !self.inner.shield.state().is_fading()
    }

    /// Whether user input should be swallowed
    pub fn is_input_blocked(&self) -> bool {
        self.inner.shield.is_blocked() || self.inner.state.lock().loading.active
    }

    /// Number of screens on the stack
    pub fn depth(&self) -> usize {
        self.inner.state.lock().stack.depth()
    }

    /// Name of the top screen
    pub fn top_screen(&self) -> Option<String> {
        self.inner
            .state
            .lock()
            .stack
            .top()
            .map(|e| e.name().to_string())
    }

    /// Name of the main (bottom) screen
    pub fn main_screen(&self) -> Option<String> {
        self.inner.state.lock().main_screen.clone()
    }

    /// Screen names from bottom to top
    pub fn stack_names(&self) -> Vec<String> {
        self.inner.state.lock().stack.names()
    }

    /// Target of the full-scene load in progress, if any
    pub fn pending_target(&self) -> Option<String> {
        self.inner.state.lock().pending_target.clone()
    }

    /// Number of requests waiting for their content
    pub fn queued_requests(&self) -> usize {
        self.inner.state.lock().queue.len()
    }

    // -------------------------------------------------------------------------
    // Load (full replace)
    // -------------------------------------------------------------------------

    /// Replace every screen with `target`, fire and forget
    ///
    /// Must be called within a tokio runtime.
    pub fn load(&self, target: impl Into<String>, payload: Option<Payload>) {
        spawn_logged("load", self.load_async(target, payload));
    }

    /// Replace every screen with `target`
    ///
    /// Rejected while the shield is fading. Resolves once the new screen's
    /// `on_shown` has run.
    pub fn load_async(
        &self,
        target: impl Into<String>,
        payload: Option<Payload>,
    ) -> impl Future<Output = Result<()>> + Send + 'static {
        let started = self.begin_load(target.into(), payload);
        let this = self.clone();

        async move {
            let (target, id, fade, completion) = started?;

            if fade.await == RunOutcome::Abandoned {
                tracing::debug!("Fade-out for {} was interrupted", target);
                this.drop_request(id, &target);
                return Err(NavigationError::Abandoned);
            }
            this.hide_main_screen();

            if let Err(e) = this.inner.host.load_content(&target, LoadMode::Replace).await {
                return Err(this.fail_request(id, &target, e));
            }

            completion.await.map_err(|_| NavigationError::Abandoned)
        }
    }

    fn begin_load(
        &self,
        target: String,
        payload: Option<Payload>,
    ) -> Result<(
        String,
        Uuid,
        impl Future<Output = RunOutcome> + Send + 'static,
        oneshot::Receiver<()>,
    )> {
        let state = self.inner.shield.state();
        if state.is_fading() {
            tracing::warn!("Rejected load of {} while shield is {}", target, state);
            return Err(NavigationError::Rejected { target, state });
        }

        let (request, completion) = NavigationRequest::new(target.clone(), LoadMode::Replace)
            .with_payload(payload)
            .with_completion();
        let id = request.id();

        {
            let mut state = self.inner.state.lock();
            state.queue.enqueue(request);
            state.pending_target = Some(target.clone());
        }

        tracing::debug!("Loading {}", target);
        let fade = self.inner.shield.fade_out_scene();
        Ok((target, id, fade, completion))
    }

    fn hide_main_screen(&self) {
        let hidden = {
            let mut state = self.inner.state.lock();
            state
                .stack
                .bottom_mut()
                .map(|e| (Arc::clone(e.screen()), e.take_on_hidden()))
        };

        if let Some((screen, on_hidden)) = hidden {
            screen.on_hidden();
            if let Some(callback) = on_hidden {
                callback();
            }
        }
    }

    // -------------------------------------------------------------------------
    // Add (overlay)
    // -------------------------------------------------------------------------

    /// Push `target` on top of the stack, fire and forget
    ///
    /// Must be called within a tokio runtime.
    pub fn add(
        &self,
        target: impl Into<String>,
        payload: Option<Payload>,
        on_shown: Option<Callback>,
        on_hidden: Option<Callback>,
    ) {
        spawn_logged("add", self.add_async(target, payload, on_shown, on_hidden));
    }

    /// Push `target` on top of the stack
    ///
    /// Input is blocked before this returns. Resolves once the screen has
    /// entered and `on_shown` has run.
    pub fn add_async(
        &self,
        target: impl Into<String>,
        payload: Option<Payload>,
        on_shown: Option<Callback>,
        on_hidden: Option<Callback>,
    ) -> impl Future<Output = Result<()>> + Send + 'static {
        let target = target.into();
        let (request, completion) = NavigationRequest::new(target.clone(), LoadMode::Additive)
            .with_payload(payload)
            .with_callbacks(on_shown, on_hidden)
            .with_completion();
        let id = request.id();

        self.inner.state.lock().queue.enqueue(request);
        self.inner.shield.shield_on();
        tracing::debug!("Adding {}", target);

        let this = self.clone();
        async move {
            if let Err(e) = this.inner.host.load_content(&target, LoadMode::Additive).await {
                return Err(this.fail_request(id, &target, e));
            }

            completion.await.map_err(|_| NavigationError::Abandoned)
        }
    }

    // -------------------------------------------------------------------------
    // Close
    // -------------------------------------------------------------------------

    /// Close the top screen, fire and forget
    ///
    /// Must be called within a tokio runtime.
    pub fn close(&self) {
        spawn_logged("close", self.close_async());
    }

    /// Close the top screen
    ///
    /// A no-op on an empty stack. The screen to close is chosen when this is
    /// called, not when the returned future first runs.
    pub fn close_async(&self) -> impl Future<Output = Result<()>> + Send + 'static {
        let closing = self.begin_close();
        let this = self.clone();

        async move {
            match closing {
                Some(closing) => this.finish_close(closing).await,
                None => Ok(()),
            }
        }
    }

    fn begin_close(&self) -> Option<Closing> {
        let (closing, below) = {
            let mut state = self.inner.state.lock();
            let Some(top) = state.stack.top() else {
                tracing::debug!("Close ignored on empty stack");
                return None;
            };
            if top.is_closing() {
                tracing::debug!("Close ignored, {} is already closing", top.name());
                return None;
            }
            let closing = Closing {
                key: top.key(),
                name: top.name().to_string(),
                screen: Arc::clone(top.screen()),
                surface: top.surface(),
            };
            let below = state.stack.below(top.key()).map(|e| e.surface());
            if let Some(entry) = state.stack.get_mut(closing.key) {
                entry.set_closing(true);
            }
            (closing, below)
        };

        self.inner.shield.shield_on();

        if closing.screen.is_full_screen() {
            if let Some(surface) = below {
                self.inner.host.set_visible(surface, true);
            }
        }

        tracing::debug!("Closing {}", closing.name);
        Some(closing)
    }

    async fn finish_close(&self, closing: Closing) -> Result<()> {
        if let Some(transition) = closing.screen.transition() {
            if transition.exit().await == RunOutcome::Abandoned {
                // Whoever interrupted the exit now owns the screen.
                tracing::debug!("Exit of {} was interrupted", closing.name);
                if let Some(entry) = self.inner.state.lock().stack.get_mut(closing.key) {
                    entry.set_closing(false);
                }
                self.release_shield();
                return Ok(());
            }
        }

        closing.screen.on_hidden();
        let on_hidden = self
            .inner
            .state
            .lock()
            .stack
            .get_mut(closing.key)
            .and_then(|e| e.take_on_hidden());
        if let Some(callback) = on_hidden {
            callback();
        }

        let unloaded = self.inner.host.unload_content(closing.surface).await;

        let (removed, refocus) = {
            let mut state = self.inner.state.lock();
            let was_top = state.stack.top().map(|e| e.key()) == Some(closing.key);
            let removed = state.stack.remove(closing.key);
            if state.stack.is_empty() {
                state.main_screen = None;
            }
            let refocus = if was_top {
                state.stack.top().map(|e| Arc::clone(e.screen()))
            } else {
                None
            };
            (removed, refocus)
        };
        drop(removed);

        if let Err(e) = unloaded {
            tracing::error!("Failed to unload {}: {}", closing.name, e);
            self.inner.shield.reset();
            return Err(e.into());
        }

        if let Some(screen) = refocus {
            screen.on_refocus();
        }

        self.release_shield();
        tracing::info!("Closed {}", closing.name);
        Ok(())
    }

    /// Forward the back key to the top screen
    pub fn key_back(&self) {
        let top = self
            .inner
            .state
            .lock()
            .stack
            .top()
            .map(|e| Arc::clone(e.screen()));

        if let Some(screen) = top {
            screen.on_key_back(self);
        }
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    /// Called by the host once a content unit is active
    ///
    /// Runs the rest of the navigation that requested the content. Never
    /// fails; problems are logged.
    pub async fn on_content_activated(&self, activation: ContentActivation) {
        let name = activation.name().to_string();

        if self.is_loading_screen(&name) {
            self.activate_loading_screen(activation);
            return;
        }

        let request = {
            let mut state = self.inner.state.lock();
            if state.pending_target.as_deref() == Some(name.as_str()) {
                state.pending_target = None;
            }
            state.queue.dequeue_or_empty(&name, activation.mode)
        };

        if request.target() != name {
            tracing::warn!(
                "Activated {} while the next request was for {}",
                name,
                request.target()
            );
        }

        match activation.mode {
            LoadMode::Replace => self.activate_main(activation, request).await,
            LoadMode::Additive => self.activate_overlay(activation, request).await,
        }
    }

    async fn activate_main(&self, activation: ContentActivation, mut request: NavigationRequest) {
        let ContentActivation { surface, screen, .. } = activation;
        let entry = StackEntry::new(Arc::clone(&screen), surface, request.take_on_hidden());
        let key = entry.key();

        let dropped = {
            let mut state = self.inner.state.lock();
            let dropped = state.stack.clear();
            state.stack.push(entry);
            state.main_screen = Some(screen.name().to_string());
            dropped
        };
        drop(dropped);

        self.inner
            .host
            .set_sort_order(surface, tokens::sort_order::for_depth(1));
        self.show_as_main(key, screen, request).await;
    }

    async fn activate_overlay(&self, activation: ContentActivation, mut request: NavigationRequest) {
        let ContentActivation { surface, screen, .. } = activation;
        let entry = StackEntry::new(Arc::clone(&screen), surface, request.take_on_hidden());
        let key = entry.key();

        let depth = {
            let mut state = self.inner.state.lock();
            let depth = state.stack.push(entry);
            if depth == 1 {
                state.main_screen = Some(screen.name().to_string());
            } else if let Some(entry) = state.stack.get_mut(key) {
                entry.set_entering(true);
            }
            depth
        };

        self.inner
            .host
            .set_sort_order(surface, tokens::sort_order::for_depth(depth));

        if depth == 1 {
            self.show_as_main(key, screen, request).await;
            return;
        }

        screen.on_active(request.take_payload());

        if let Some(transition) = screen.transition() {
            transition.prepare_for_entry();
            if transition.enter().await == RunOutcome::Abandoned {
                // Whoever interrupted the enter now owns the shield.
                tracing::debug!("Enter of {} was interrupted", screen.name());
                if let Some(entry) = self.inner.state.lock().stack.get_mut(key) {
                    entry.set_entering(false);
                }
                return;
            }
        }

        let below = {
            let mut state = self.inner.state.lock();
            match state.stack.get_mut(key) {
                Some(entry) => {
                    entry.set_entering(false);
                    Some(state.stack.below(key).map(|e| e.surface()))
                }
                None => None,
            }
        };
        let Some(below) = below else {
            tracing::debug!("{} left the stack before it was shown", screen.name());
            return;
        };

        if screen.is_full_screen() {
            if let Some(surface) = below {
                self.inner.host.set_visible(surface, false);
            }
        }

        self.complete_shown(&screen, request);
        self.release_shield();
        tracing::info!("Added {}", screen.name());
    }

    async fn show_as_main(&self, key: Uuid, screen: Arc<dyn Screen>, mut request: NavigationRequest) {
        screen.on_active(request.take_payload());

        if let Some(transition) = screen.transition() {
            transition.prepare_for_entry();
            transition.finish_enter();
        }

        if self.inner.shield.fade_in_scene().await == RunOutcome::Abandoned {
            tracing::debug!("Fade-in for {} was interrupted", screen.name());
            return;
        }

        if !self.inner.state.lock().stack.contains(key) {
            tracing::debug!("{} left the stack before it was shown", screen.name());
            return;
        }

        self.complete_shown(&screen, request);
        tracing::info!("Loaded {}", screen.name());
    }

    fn complete_shown(&self, screen: &Arc<dyn Screen>, mut request: NavigationRequest) {
        screen.on_shown();
        if let Some(callback) = request.take_on_shown() {
            callback();
        }
        request.complete();
    }

    /// Lower the shield once no overlay is entering, closing or requested
    fn release_shield(&self) {
        let settled = {
            let state = self.inner.state.lock();
            state.stack.is_settled() && state.queue.is_empty()
        };

        if settled {
            self.inner.shield.shield_off();
        } else {
            tracing::debug!("Shield kept on for navigations still in flight");
        }
    }

    fn fail_request(&self, id: Uuid, target: &str, error: PlatformError) -> NavigationError {
        tracing::error!("Failed to load {}: {}", target, error);
        self.drop_request(id, target);
        self.inner.shield.reset();
        NavigationError::Host(error)
    }

    fn drop_request(&self, id: Uuid, target: &str) {
        let removed = {
            let mut state = self.inner.state.lock();
            if state.pending_target.as_deref() == Some(target) {
                state.pending_target = None;
            }
            state.queue.remove(id)
        };
        drop(removed);
    }

    // -------------------------------------------------------------------------
    // Loading indicator
    // -------------------------------------------------------------------------

    /// Reserve `name` as the loading indicator and ask the host to load it
    ///
    /// The indicator never enters the stack or consumes queued requests.
    pub fn set_loading_screen(
        &self,
        name: impl Into<String>,
    ) -> impl Future<Output = Result<()>> + Send + 'static {
        let name = name.into();
        self.inner.state.lock().loading.name = Some(name.clone());

        let host = Arc::clone(&self.inner.host);
        async move {
            host.load_content(&name, LoadMode::Additive)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to load loading screen {}: {}", name, e);
                    NavigationError::Host(e)
                })
        }
    }

    /// Show or hide the loading indicator
    ///
    /// Logs and returns [`NavigationError::MissingCollaborator`] when no
    /// indicator has been activated yet.
    pub fn loading_animation(&self, active: bool) -> Result<()> {
        let surface = {
            let mut state = self.inner.state.lock();
            let surface = state.loading.surface;
            if surface.is_some() {
                state.loading.active = active;
            }
            surface
        };

        match surface {
            Some(surface) => {
                self.inner.host.set_visible(surface, active);
                Ok(())
            }
            None => {
                let err = NavigationError::MissingCollaborator("loading screen".to_string());
                tracing::error!("Cannot toggle loading animation: {}", err);
                Err(err)
            }
        }
    }

    /// Whether the loading indicator is currently shown
    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().loading.active
    }

    fn is_loading_screen(&self, name: &str) -> bool {
        self.inner.state.lock().loading.name.as_deref() == Some(name)
    }

    fn activate_loading_screen(&self, activation: ContentActivation) {
        let surface = activation.surface;
        self.inner
            .host
            .set_sort_order(surface, self.inner.config.loading_sort_order);
        self.inner.host.set_visible(surface, false);

        let mut state = self.inner.state.lock();
        state.loading.surface = Some(surface);
        state.loading.screen = Some(activation.screen);
        state.loading.active = false;
        tracing::debug!("Loading screen ready on {}", surface);
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Drop every screen and pending request and release the shield
    ///
    /// Pending `*_async` calls resolve with [`NavigationError::Abandoned`].
    /// Content is not unloaded; the host owns that on shutdown.
    pub fn teardown(&self) {
        let (entries, requests, indicator) = {
            let mut state = self.inner.state.lock();
            state.main_screen = None;
            state.pending_target = None;
            let indicator = state.loading.screen.take();
            state.loading.surface = None;
            state.loading.active = false;
            (state.stack.clear(), state.queue.clear(), indicator)
        };

        self.inner.shield.reset();
        tracing::info!(
            "Navigator torn down ({} screens, {} pending requests)",
            entries.len(),
            requests.len()
        );
        drop((entries, requests, indicator));
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Navigator")
            .field("stack", &state.stack.names())
            .field("queued", &state.queue.len())
            .field("main_screen", &state.main_screen)
            .field("shield", &self.inner.shield.state())
            .finish()
    }
}

fn spawn_logged(what: &'static str, navigation: impl Future<Output = Result<()>> + Send + 'static) {
    tokio::spawn(async move {
        match navigation.await {
            Ok(()) => {}
            // Rejections and host failures are logged where they happen.
            Err(NavigationError::Rejected { .. }) | Err(NavigationError::Host(_)) => {}
            Err(e) => tracing::debug!("{} did not complete: {}", what, e),
        }
    });
}
