//! Pending navigation requests
//!
//! A request is created when a caller asks to navigate and is consumed, in
//! FIFO order, by the next content activation the host reports.

use scene_platform::LoadMode;
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Opaque data handed to the target screen's `on_active`
pub type Payload = Arc<dyn Any + Send + Sync>;

/// One-shot lifecycle callback
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// A navigation waiting for its content to become active
pub struct NavigationRequest {
    id: Uuid,
    target: String,
    mode: LoadMode,
    payload: Option<Payload>,
    on_shown: Option<Callback>,
    on_hidden: Option<Callback>,
    completion: Option<oneshot::Sender<()>>,
}

impl NavigationRequest {
    /// Create a request with no payload or callbacks
    pub fn new(target: impl Into<String>, mode: LoadMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            target: target.into(),
            mode,
            payload: None,
            on_shown: None,
            on_hidden: None,
            completion: None,
        }
    }

    /// Attach data for the target screen
    pub fn with_payload(mut self, payload: Option<Payload>) -> Self {
        self.payload = payload;
        self
    }

    /// Attach lifecycle callbacks
    pub fn with_callbacks(mut self, on_shown: Option<Callback>, on_hidden: Option<Callback>) -> Self {
        self.on_shown = on_shown;
        self.on_hidden = on_hidden;
        self
    }

    /// Attach a completion notifier, resolved once the target is shown
    ///
    /// The receiver errors if the request is dropped without being shown.
    pub fn with_completion(mut self) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        self.completion = Some(tx);
        (self, rx)
    }

    /// Unique id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Target screen name
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Load mode
    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Whether a payload is attached
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Take the payload
    pub fn take_payload(&mut self) -> Option<Payload> {
        self.payload.take()
    }

    /// Take the shown callback
    pub fn take_on_shown(&mut self) -> Option<Callback> {
        self.on_shown.take()
    }

    /// Take the hidden callback
    pub fn take_on_hidden(&mut self) -> Option<Callback> {
        self.on_hidden.take()
    }

    /// Resolve the completion notifier, if any
    pub fn complete(&mut self) {
        if let Some(tx) = self.completion.take() {
            let _ = tx.send(());
        }
    }
}

impl fmt::Debug for NavigationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationRequest")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("mode", &self.mode)
            .field("has_payload", &self.payload.is_some())
            .field("has_on_shown", &self.on_shown.is_some())
            .field("has_on_hidden", &self.on_hidden.is_some())
            .finish()
    }
}

/// FIFO queue of pending requests
#[derive(Debug, Default)]
pub struct RequestQueue {
    pending: VecDeque<NavigationRequest>,
}

impl RequestQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request
    pub fn enqueue(&mut self, request: NavigationRequest) {
        self.pending.push_back(request);
    }

    /// Take the oldest request
    pub fn dequeue(&mut self) -> Option<NavigationRequest> {
        self.pending.pop_front()
    }

    /// Take the oldest request, or synthesize an empty one for `target`
    pub fn dequeue_or_empty(&mut self, target: &str, mode: LoadMode) -> NavigationRequest {
        self.dequeue().unwrap_or_else(|| {
            tracing::debug!("No queued request for {}, using empty data", target);
            NavigationRequest::new(target, mode)
        })
    }

    /// Remove a specific request (e.g. after its load failed)
    pub fn remove(&mut self, id: Uuid) -> Option<NavigationRequest> {
        let index = self.pending.iter().position(|r| r.id == id)?;
        self.pending.remove(index)
    }

    /// Drop every pending request
    pub fn clear(&mut self) -> Vec<NavigationRequest> {
        self.pending.drain(..).collect()
    }

    /// Number of pending requests
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
