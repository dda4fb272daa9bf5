use std::sync::Arc;

use reader_core::location::DocumentLocation;
use reader_core::model::{Bookmark, PageIndex};
use reader_core::path::PathRoots;
use storage::repository::BookmarkStore;

use crate::error::BookmarkError;

/// Bookmark operations for the currently viewed document.
///
/// Keyed by the same canonical location path as progress updates, so a
/// bookmark saved from the reader matches the store's progress records.
pub struct BookmarkService {
    store: Arc<dyn BookmarkStore>,
    roots: PathRoots,
}

impl BookmarkService {
    #[must_use]
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self {
            store,
            roots: PathRoots::default(),
        }
    }

    #[must_use]
    pub fn with_roots(mut self, roots: PathRoots) -> Self {
        self.roots = roots;
        self
    }

    /// Bookmarks recorded for the current document.
    ///
    /// # Errors
    ///
    /// Returns `BookmarkError` if the store cannot be read.
    pub async fn list(&self, location: &DocumentLocation) -> Result<Vec<Bookmark>, BookmarkError> {
        let path = self.roots.canonical_location(location.path());
        let set = self.store.bookmarks_for(&path).await?;
        Ok(set.bookmarks)
    }

    /// Save a bookmark at `page`, overwriting one with the same title.
    ///
    /// Returns the document's bookmark list after the write.
    ///
    /// # Errors
    ///
    /// Returns `BookmarkError::EmptyTitle` for a blank title, or a store
    /// error if the write fails.
    pub async fn save(
        &self,
        location: &DocumentLocation,
        title: &str,
        page: PageIndex,
    ) -> Result<Vec<Bookmark>, BookmarkError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BookmarkError::EmptyTitle);
        }
        let path = self.roots.canonical_location(location.path());
        let bookmark = Bookmark {
            title: title.to_string(),
            page_idx: page,
        };
        Ok(self.store.upsert_bookmark(&path, &bookmark).await?)
    }

    /// Remove the bookmark with the given title, if present.
    ///
    /// # Errors
    ///
    /// Returns `BookmarkError` if the store write fails.
    pub async fn remove(
        &self,
        location: &DocumentLocation,
        title: &str,
    ) -> Result<(), BookmarkError> {
        let path = self.roots.canonical_location(location.path());
        Ok(self.store.delete_bookmark(&path, title).await?)
    }
}
