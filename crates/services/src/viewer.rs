//! Integration contract for the page viewer.

use std::sync::{Arc, Mutex};

/// The viewer reduced to its single numeric page control.
///
/// Page numbers are 1-based on this boundary, matching what the control
/// displays; the sync layer converts to store indices. Implementations
/// must emit their change notification from `set_page_number` so dependent
/// UI reacts to a programmatic jump the same way as to a user one.
pub trait PageViewer: Send + Sync {
    /// Current 1-based page number, or `None` when the control is
    /// missing or unreadable.
    fn page_number(&self) -> Option<u32>;

    /// Move the viewer to a 1-based page and notify listeners.
    fn set_page_number(&self, page: u32);

    /// Upper bound of the page range. Read once at startup; immutable for
    /// the session.
    fn page_count(&self) -> u32;
}

/// Thread-safe in-memory viewer for tests and headless drivers.
///
/// Counts change notifications so tests can observe that a programmatic
/// jump announced itself.
#[derive(Clone)]
pub struct SharedViewer {
    page: Arc<Mutex<Option<u32>>>,
    count: u32,
    changes: Arc<Mutex<u32>>,
}

impl SharedViewer {
    /// A viewer showing page 1 of `count` pages.
    #[must_use]
    pub fn new(count: u32) -> Self {
        Self {
            page: Arc::new(Mutex::new(Some(1))),
            count,
            changes: Arc::new(Mutex::new(0)),
        }
    }

    /// A viewer whose page control reads as broken.
    #[must_use]
    pub fn unreadable(count: u32) -> Self {
        Self {
            page: Arc::new(Mutex::new(None)),
            count,
            changes: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of change notifications emitted so far.
    #[must_use]
    pub fn change_count(&self) -> u32 {
        self.changes.lock().map(|guard| *guard).unwrap_or(0)
    }
}

impl PageViewer for SharedViewer {
    fn page_number(&self) -> Option<u32> {
        self.page.lock().ok().and_then(|guard| *guard)
    }

    fn set_page_number(&self, page: u32) {
        if let Ok(mut guard) = self.page.lock() {
            *guard = Some(page);
        }
        if let Ok(mut guard) = self.changes.lock() {
            *guard += 1;
        }
    }

    fn page_count(&self) -> u32 {
        self.count
    }
}
