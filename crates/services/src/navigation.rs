//! Previous/next document resolution against the progress list.

use std::sync::Arc;

use reader_core::location::DocumentLocation;
use reader_core::model::position_of;
use reader_core::path::PathRoots;
use storage::repository::ProgressStore;

use crate::error::NavigationError;

const DEFAULT_LIBRARY_ROUTE: &str = "/serve_bookshelf";

/// Where a navigation request resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Send the shell to this absolute route.
    Navigate(String),
    /// The current document is first in the list, or not listed at all.
    NoPrevious,
    /// The current document is last in the list, or not listed at all.
    NoNext,
}

/// Resolves sibling documents from the progress list's given order.
///
/// Every call fetches the list fresh: its composition may have changed
/// since the view loaded, and a stale cache would navigate into the past.
/// List order is trusted as document order; no independent sort key is
/// consulted.
pub struct SiblingNavigatorService {
    store: Arc<dyn ProgressStore>,
    roots: PathRoots,
    library_route: String,
}

impl SiblingNavigatorService {
    #[must_use]
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self {
            store,
            roots: PathRoots::default(),
            library_route: DEFAULT_LIBRARY_ROUTE.to_string(),
        }
    }

    #[must_use]
    pub fn with_roots(mut self, roots: PathRoots) -> Self {
        self.roots = roots;
        self
    }

    #[must_use]
    pub fn with_library_route(mut self, route: impl Into<String>) -> Self {
        self.library_route = route.into();
        self
    }

    /// Resolve the document before the current one.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError` when the progress list cannot be fetched;
    /// the operation aborts without navigating.
    pub async fn previous(
        &self,
        location: &DocumentLocation,
    ) -> Result<NavOutcome, NavigationError> {
        let entries = self.store.list_progress().await?;
        Ok(
            match position_of(&entries, &self.roots, location.path()) {
                Some(idx) if idx > 0 => self.navigate_to(&entries[idx - 1].path),
                _ => NavOutcome::NoPrevious,
            },
        )
    }

    /// Resolve the document after the current one.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError` when the progress list cannot be fetched;
    /// the operation aborts without navigating.
    pub async fn next(&self, location: &DocumentLocation) -> Result<NavOutcome, NavigationError> {
        let entries = self.store.list_progress().await?;
        Ok(
            match position_of(&entries, &self.roots, location.path()) {
                Some(idx) if idx + 1 < entries.len() => self.navigate_to(&entries[idx + 1].path),
                _ => NavOutcome::NoNext,
            },
        )
    }

    /// The fixed return-to-library route. The shell maps its escape
    /// gesture here as well.
    #[must_use]
    pub fn library_route(&self) -> &str {
        &self.library_route
    }

    fn navigate_to(&self, path: &str) -> NavOutcome {
        // Case-preserving: the target must be a path the server serves.
        NavOutcome::Navigate(format!("/{}", self.roots.route_for(path)))
    }
}
