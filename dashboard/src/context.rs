//! Application-wide services handed to every screen
//!
//! The loading overlay and the sidebar flag are the only state shared across
//! screens. They live in an `AppContext` created by the application root and
//! passed down explicitly.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Reference-counted busy indicator. The overlay is shown while at least one
/// `LoadingGuard` is alive.
#[derive(Debug)]
pub struct LoadingOverlay {
    active: watch::Sender<usize>,
}

impl LoadingOverlay {
    pub fn new() -> Self {
        let (active, _) = watch::channel(0);
        Self { active }
    }

    pub fn begin(self: &Arc<Self>, reason: &str) -> LoadingGuard {
        self.active.send_modify(|count| *count += 1);
        debug!(reason, pending = self.pending(), "loading started");
        LoadingGuard {
            overlay: Arc::clone(self),
        }
    }

    fn end(&self) {
        self.active.send_modify(|count| *count = count.saturating_sub(1));
        debug!(pending = self.pending(), "loading finished");
    }

    pub fn pending(&self) -> usize {
        *self.active.borrow()
    }

    pub fn is_active(&self) -> bool {
        self.pending() > 0
    }

    /// Receiver that observes the number of outstanding loads
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.active.subscribe()
    }
}

impl Default for LoadingOverlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Ends its load when dropped, so an early return or error can never leave
/// the overlay stuck on.
#[derive(Debug)]
pub struct LoadingGuard {
    overlay: Arc<LoadingOverlay>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.overlay.end();
    }
}

/// Sidebar expanded flag, kept in memory for the session only
#[derive(Debug)]
pub struct Sidebar {
    expanded: AtomicBool,
}

impl Sidebar {
    pub fn new(expanded: bool) -> Self {
        Self {
            expanded: AtomicBool::new(expanded),
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.load(Ordering::SeqCst)
    }

    pub fn set_expanded(&self, expanded: bool) {
        self.expanded.store(expanded, Ordering::SeqCst);
    }

    /// Flips the flag and returns the new value
    pub fn toggle(&self) -> bool {
        !self.expanded.fetch_xor(true, Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    pub loading: Arc<LoadingOverlay>,
    pub sidebar: Arc<Sidebar>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            loading: Arc::new(LoadingOverlay::new()),
            sidebar: Arc::new(Sidebar::new(true)),
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}
