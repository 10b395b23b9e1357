//! Ordered stack of active screens
//!
//! Bottom is the main screen; top is the most recent overlay.

use scene_platform::SurfaceHandle;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::request::Callback;
use crate::screen::Screen;

/// One screen on the stack
pub struct StackEntry {
    key: Uuid,
    screen: Arc<dyn Screen>,
    surface: SurfaceHandle,
    on_hidden: Option<Callback>,
    entering: bool,
    closing: bool,
}

impl StackEntry {
    /// Create an entry with a fresh key
    pub fn new(screen: Arc<dyn Screen>, surface: SurfaceHandle, on_hidden: Option<Callback>) -> Self {
        Self {
            key: Uuid::new_v4(),
            screen,
            surface,
            on_hidden,
            entering: false,
            closing: false,
        }
    }

    /// Unique key of this stack position
    pub fn key(&self) -> Uuid {
        self.key
    }

    /// Screen name
    pub fn name(&self) -> &str {
        self.screen.name()
    }

    /// The screen
    pub fn screen(&self) -> &Arc<dyn Screen> {
        &self.screen
    }

    /// Render surface
    pub fn surface(&self) -> SurfaceHandle {
        self.surface
    }

    /// Take the caller's hidden callback
    pub fn take_on_hidden(&mut self) -> Option<Callback> {
        self.on_hidden.take()
    }

    /// Whether the enter animation is still running
    pub fn is_entering(&self) -> bool {
        self.entering
    }

    /// Mark the enter animation as started or finished
    pub fn set_entering(&mut self, entering: bool) {
        self.entering = entering;
    }

    /// Whether a close has claimed this entry
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Claim or release this entry for a close
    pub fn set_closing(&mut self, closing: bool) {
        self.closing = closing;
    }
}

impl fmt::Debug for StackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackEntry")
            .field("key", &self.key)
            .field("name", &self.name())
            .field("surface", &self.surface)
            .field("entering", &self.entering)
            .field("closing", &self.closing)
            .finish()
    }
}

/// Screens in display order
#[derive(Debug, Default)]
pub struct ViewStack {
    entries: Vec<StackEntry>,
}

impl ViewStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push on top, returning the new depth
    pub fn push(&mut self, entry: StackEntry) -> usize {
        self.entries.push(entry);
        self.entries.len()
    }

    /// Remove the top entry
    pub fn pop(&mut self) -> Option<StackEntry> {
        self.entries.pop()
    }

    /// Remove the entry with `key`, wherever it is
    pub fn remove(&mut self, key: Uuid) -> Option<StackEntry> {
        let index = self.position(key)?;
        Some(self.entries.remove(index))
    }

    /// Remove everything
    pub fn clear(&mut self) -> Vec<StackEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Top entry
    pub fn top(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    /// Bottom (main) entry
    pub fn bottom(&self) -> Option<&StackEntry> {
        self.entries.first()
    }

    /// Bottom (main) entry, mutably
    pub fn bottom_mut(&mut self) -> Option<&mut StackEntry> {
        self.entries.first_mut()
    }

    /// Entry with `key`
    pub fn get_mut(&mut self, key: Uuid) -> Option<&mut StackEntry> {
        self.entries.iter_mut().find(|e| e.key == key)
    }

    /// Whether an entry with `key` is still on the stack
    pub fn contains(&self, key: Uuid) -> bool {
        self.position(key).is_some()
    }

    /// Entry directly beneath the one with `key`
    pub fn below(&self, key: Uuid) -> Option<&StackEntry> {
        let index = self.position(key)?;
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Number of entries
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether no entry is entering or being closed
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|e| !e.entering && !e.closing)
    }

    /// Screen names from bottom to top
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name().to_string()).collect()
    }

    fn position(&self, key: Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }
}
