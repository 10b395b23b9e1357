//! Test doubles for end-to-end navigation flows
//!
//! Enabled with the `test-utils` feature. [`ScriptedHost`] records every host
//! call and forwards load requests to [`serve`], which activates the content
//! after a configurable latency, the way a real host would.

use async_trait::async_trait;
use parking_lot::Mutex;
use scene_platform::{ContentHost, LoadMode, PlatformError, Result as HostResult, SurfaceHandle};
use scene_ui::transition::{ScreenTransition, TransitionKind, TransitionSpec};
use scene_ui::visual::Extent;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::NavigatorConfig;
use crate::navigator::Navigator;
use crate::request::Payload;
use crate::screen::{ContentActivation, Screen};

// =============================================================================
// Event Log
// =============================================================================

/// Shared, ordered record of `"Screen:hook"` events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    /// Append an event
    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().push(event.into());
    }

    /// All events so far
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    /// How many times `event` was recorded
    pub fn count(&self, event: &str) -> usize {
        self.events.lock().iter().filter(|e| *e == event).count()
    }

    /// Index of the first occurrence of `event`
    pub fn position(&self, event: &str) -> Option<usize> {
        self.events.lock().iter().position(|e| e == event)
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

// =============================================================================
// Recording Screen
// =============================================================================

/// Screen that records each hook call into an [`EventLog`]
pub struct RecordingScreen {
    name: String,
    log: EventLog,
    transition: Option<ScreenTransition>,
    full_screen: bool,
    payload: Mutex<Option<Payload>>,
}

impl RecordingScreen {
    /// Screen with the default slide transition
    pub fn new(name: impl Into<String>, log: EventLog) -> Self {
        Self {
            name: name.into(),
            log,
            transition: Some(ScreenTransition::with_default_ticker(
                TransitionSpec::default(),
                Extent::default(),
            )),
            full_screen: false,
            payload: Mutex::new(None),
        }
    }

    /// Replace the transition
    pub fn with_transition(mut self, spec: TransitionSpec) -> Self {
        self.transition = Some(ScreenTransition::with_default_ticker(spec, Extent::default()));
        self
    }

    /// Remove the transition entirely
    pub fn without_transition(mut self) -> Self {
        self.transition = None;
        self
    }

    /// Mark as covering everything below
    pub fn full_screen(mut self) -> Self {
        self.full_screen = true;
        self
    }

    /// Payload received by the last `on_active`
    pub fn last_payload(&self) -> Option<Payload> {
        self.payload.lock().clone()
    }

    fn record(&self, hook: &str) {
        self.log.push(format!("{}:{}", self.name, hook));
    }
}

impl Screen for RecordingScreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn transition(&self) -> Option<&ScreenTransition> {
        self.transition.as_ref()
    }

    fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    fn on_active(&self, payload: Option<Payload>) {
        *self.payload.lock() = payload;
        self.record("on_active");
    }

    fn on_shown(&self) {
        self.record("on_shown");
    }

    fn on_hidden(&self) {
        self.record("on_hidden");
    }

    fn on_refocus(&self) {
        self.record("on_refocus");
    }

    fn on_key_back(&self, navigator: &Navigator) {
        self.record("on_key_back");
        navigator.close();
    }
}

// =============================================================================
// Scripted Host
// =============================================================================

/// A call made on [`ScriptedHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `load_content`
    Load {
        /// Content name
        name: String,
        /// Load mode
        mode: LoadMode,
    },
    /// `unload_content`
    Unload(SurfaceHandle),
    /// `set_visible`
    SetVisible(SurfaceHandle, bool),
    /// `set_sort_order`
    SetSortOrder(SurfaceHandle, i32),
}

/// Host that records calls and forwards accepted loads to [`serve`]
pub struct ScriptedHost {
    calls: Mutex<Vec<HostCall>>,
    failing: Mutex<HashSet<String>>,
    requests: mpsc::UnboundedSender<(String, LoadMode)>,
}

impl ScriptedHost {
    /// Create a host and the receiving end of its load requests
    pub fn create() -> (Arc<Self>, mpsc::UnboundedReceiver<(String, LoadMode)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let host = Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            requests: tx,
        });
        (host, rx)
    }

    /// Make every future load of `name` fail
    pub fn fail_loads_of(&self, name: impl Into<String>) {
        self.failing.lock().insert(name.into());
    }

    /// Every call so far
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    /// Names passed to `load_content`, in order
    pub fn loads(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                HostCall::Load { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Surfaces passed to `unload_content`, in order
    pub fn unloads(&self) -> Vec<SurfaceHandle> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                HostCall::Unload(surface) => Some(*surface),
                _ => None,
            })
            .collect()
    }

    /// Last visibility set for `surface`
    pub fn visibility(&self, surface: SurfaceHandle) -> Option<bool> {
        self.calls.lock().iter().rev().find_map(|c| match c {
            HostCall::SetVisible(s, visible) if *s == surface => Some(*visible),
            _ => None,
        })
    }

    /// Last sort order set for `surface`
    pub fn sort_order(&self, surface: SurfaceHandle) -> Option<i32> {
        self.calls.lock().iter().rev().find_map(|c| match c {
            HostCall::SetSortOrder(s, order) if *s == surface => Some(*order),
            _ => None,
        })
    }
}

#[async_trait]
impl ContentHost for ScriptedHost {
    async fn load_content(&self, name: &str, mode: LoadMode) -> HostResult<()> {
        self.calls.lock().push(HostCall::Load {
            name: name.to_string(),
            mode,
        });

        if self.failing.lock().contains(name) {
            return Err(PlatformError::ContentNotFound(name.to_string()));
        }

        self.requests
            .send((name.to_string(), mode))
            .map_err(|_| PlatformError::LoadFailed {
                name: name.to_string(),
                reason: "host is not serving".to_string(),
            })
    }

    async fn unload_content(&self, surface: SurfaceHandle) -> HostResult<()> {
        self.calls.lock().push(HostCall::Unload(surface));
        Ok(())
    }

    fn set_visible(&self, surface: SurfaceHandle, visible: bool) {
        self.calls.lock().push(HostCall::SetVisible(surface, visible));
    }

    fn set_sort_order(&self, surface: SurfaceHandle, order: i32) {
        self.calls.lock().push(HostCall::SetSortOrder(surface, order));
    }
}

/// Activate each requested content unit after `latency`
///
/// Surfaces are numbered from 1 in request order. Each activation runs on its
/// own task, like a host callback would.
pub fn serve<F>(
    navigator: Navigator,
    mut requests: mpsc::UnboundedReceiver<(String, LoadMode)>,
    latency: Duration,
    factory: F,
) -> JoinHandle<()>
where
    F: Fn(&str) -> Arc<dyn Screen> + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut next_surface = 1u64;
        while let Some((name, mode)) = requests.recv().await {
            let activation = ContentActivation::new(factory(&name), SurfaceHandle(next_surface), mode);
            next_surface += 1;

            let navigator = navigator.clone();
            tokio::spawn(async move {
                tokio::time::sleep(latency).await;
                navigator.on_content_activated(activation).await;
            });
        }
    })
}

// =============================================================================
// Harness
// =============================================================================

/// Navigator wired to a [`ScriptedHost`] serving [`RecordingScreen`]s
pub struct Harness {
    /// Navigator under test
    pub navigator: Navigator,
    /// Host double
    pub host: Arc<ScriptedHost>,
    /// Hook events from every screen
    pub log: EventLog,
    full_screen: Arc<Mutex<HashSet<String>>>,
    screens: Arc<Mutex<Vec<Arc<RecordingScreen>>>>,
    server: JoinHandle<()>,
}

impl Harness {
    /// Harness with a 20ms load latency
    pub fn new(config: NavigatorConfig) -> Self {
        Self::with_latency(config, Duration::from_millis(20))
    }

    /// Harness with a custom load latency
    pub fn with_latency(config: NavigatorConfig, latency: Duration) -> Self {
        let (host, requests) = ScriptedHost::create();
        let spec = config.transition_spec(TransitionKind::default());
        let navigator = Navigator::new(config, host.clone());
        let log = EventLog::default();
        let full_screen = Arc::new(Mutex::new(HashSet::new()));
        let screens = Arc::new(Mutex::new(Vec::new()));

        let factory = {
            let log = log.clone();
            let full_screen = Arc::clone(&full_screen);
            let screens = Arc::clone(&screens);
            move |name: &str| -> Arc<dyn Screen> {
                let mut screen = RecordingScreen::new(name, log.clone()).with_transition(spec);
                if full_screen.lock().contains(name) {
                    screen = screen.full_screen();
                }
                let screen = Arc::new(screen);
                screens.lock().push(Arc::clone(&screen));
                screen
            }
        };

        let server = serve(navigator.clone(), requests, latency, factory);

        Self {
            navigator,
            host,
            log,
            full_screen,
            screens,
            server,
        }
    }

    /// Most recently created screen called `name`
    pub fn screen(&self, name: &str) -> Option<Arc<RecordingScreen>> {
        self.screens
            .lock()
            .iter()
            .rev()
            .find(|s| s.name() == name)
            .cloned()
    }

    /// Screens called `name` will be created full-screen
    pub fn mark_full_screen(&self, name: impl Into<String>) {
        self.full_screen.lock().insert(name.into());
    }

    /// Let every in-flight navigation finish
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.server.abort();
    }
}
