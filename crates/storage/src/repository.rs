use async_trait::async_trait;
use reader_core::model::{Bookmark, BookmarkSet, ProgressEntry, ProgressUpdate, position_of};
use reader_core::path::PathRoots;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by progress-store adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unexpected status {0}")]
    Status(u16),
}

/// Store contract for reading-progress records.
///
/// The store is opaque to the client: a list-read plus an upsert. List
/// order is trusted as document order for sibling navigation.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Fetch the full progress list in the store's given order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the list cannot be read or decoded.
    async fn list_progress(&self) -> Result<Vec<ProgressEntry>, StoreError>;

    /// Record the last-read page for a document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store rejects or cannot receive the update.
    async fn update_progress(&self, update: &ProgressUpdate) -> Result<(), StoreError>;
}

/// Store contract for per-document bookmarks.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Fetch the bookmarks recorded for one document path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the set cannot be read or decoded.
    async fn bookmarks_for(&self, path: &str) -> Result<BookmarkSet, StoreError>;

    /// Add a bookmark, overwriting one with the same title.
    ///
    /// Returns the document's bookmark list after the write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    async fn upsert_bookmark(
        &self,
        path: &str,
        bookmark: &Bookmark,
    ) -> Result<Vec<Bookmark>, StoreError>;

    /// Remove the bookmark with the given title, if present.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    async fn delete_bookmark(&self, path: &str, title: &str) -> Result<(), StoreError>;
}

/// Simple in-memory store implementation for testing and prototyping.
///
/// Keys records by normalized path, like the real server does before
/// comparing.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    roots: PathRoots,
    progress: Arc<Mutex<Vec<ProgressEntry>>>,
    bookmarks: Arc<Mutex<Vec<BookmarkSet>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the progress list, preserving the given document order.
    #[must_use]
    pub fn with_entries(self, entries: Vec<ProgressEntry>) -> Self {
        *self.progress.lock().expect("progress lock") = entries;
        self
    }
}

#[async_trait]
impl ProgressStore for InMemoryStore {
    async fn list_progress(&self) -> Result<Vec<ProgressEntry>, StoreError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn update_progress(&self, update: &ProgressUpdate) -> Result<(), StoreError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        match position_of(&guard, &self.roots, &update.path) {
            Some(idx) => guard[idx].page_idx = update.page_idx,
            None => guard.push(ProgressEntry {
                path: update.path.clone(),
                page_idx: update.page_idx,
            }),
        }
        Ok(())
    }
}

#[async_trait]
impl BookmarkStore for InMemoryStore {
    async fn bookmarks_for(&self, path: &str) -> Result<BookmarkSet, StoreError> {
        let guard = self
            .bookmarks
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let needle = self.roots.normalize(path);
        Ok(guard
            .iter()
            .find(|set| self.roots.normalize(&set.path) == needle)
            .cloned()
            .unwrap_or_else(|| BookmarkSet {
                path: path.to_string(),
                bookmarks: Vec::new(),
            }))
    }

    async fn upsert_bookmark(
        &self,
        path: &str,
        bookmark: &Bookmark,
    ) -> Result<Vec<Bookmark>, StoreError> {
        let mut guard = self
            .bookmarks
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let needle = self.roots.normalize(path);
        let idx = match guard
            .iter()
            .position(|set| self.roots.normalize(&set.path) == needle)
        {
            Some(idx) => idx,
            None => {
                guard.push(BookmarkSet {
                    path: path.to_string(),
                    bookmarks: Vec::new(),
                });
                guard.len() - 1
            }
        };
        let set = &mut guard[idx];

        match set
            .bookmarks
            .iter_mut()
            .find(|existing| existing.title == bookmark.title)
        {
            Some(existing) => existing.page_idx = bookmark.page_idx,
            None => set.bookmarks.push(bookmark.clone()),
        }
        Ok(set.bookmarks.clone())
    }

    async fn delete_bookmark(&self, path: &str, title: &str) -> Result<(), StoreError> {
        let mut guard = self
            .bookmarks
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let needle = self.roots.normalize(path);
        if let Some(set) = guard
            .iter_mut()
            .find(|set| self.roots.normalize(&set.path) == needle)
        {
            set.bookmarks.retain(|bookmark| bookmark.title != title);
        }
        Ok(())
    }
}

/// Aggregates the store traits behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressStore>,
    pub bookmarks: Arc<dyn BookmarkStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        let progress: Arc<dyn ProgressStore> = Arc::new(store.clone());
        let bookmarks: Arc<dyn BookmarkStore> = Arc::new(store);
        Self {
            progress,
            bookmarks,
        }
    }

    /// Backed by the HTTP progress server at `base_url`.
    #[must_use]
    pub fn http(base_url: &str) -> Self {
        let store = crate::http::HttpStore::new(base_url);
        let progress: Arc<dyn ProgressStore> = Arc::new(store.clone());
        let bookmarks: Arc<dyn BookmarkStore> = Arc::new(store);
        Self {
            progress,
            bookmarks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_core::model::PageIndex;

    fn update(path: &str, page: u32) -> ProgressUpdate {
        ProgressUpdate {
            path: path.to_string(),
            page_idx: PageIndex::new(page),
            last_page_idx: 100,
        }
    }

    #[tokio::test]
    async fn upsert_updates_entry_matched_by_normalized_path() {
        let store = InMemoryStore::new().with_entries(vec![ProgressEntry {
            path: "./manga/Vol1.html".to_string(),
            page_idx: PageIndex::new(0),
        }]);

        store
            .update_progress(&update("/static/manga/VOL1.html", 7))
            .await
            .unwrap();

        let entries = store.list_progress().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "./manga/Vol1.html");
        assert_eq!(entries[0].page_idx, PageIndex::new(7));
    }

    #[tokio::test]
    async fn upsert_appends_unknown_paths_in_order() {
        let store = InMemoryStore::new();
        store.update_progress(&update("./manga/A.html", 1)).await.unwrap();
        store.update_progress(&update("./manga/B.html", 2)).await.unwrap();

        let entries = store.list_progress().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "./manga/A.html");
        assert_eq!(entries[1].path, "./manga/B.html");
    }

    #[tokio::test]
    async fn bookmark_save_overwrites_same_title() {
        let store = InMemoryStore::new();
        let first = Bookmark {
            title: "mark".to_string(),
            page_idx: PageIndex::new(3),
        };
        let second = Bookmark {
            title: "mark".to_string(),
            page_idx: PageIndex::new(9),
        };

        store
            .upsert_bookmark("./manga/Vol1.html", &first)
            .await
            .unwrap();
        let after = store
            .upsert_bookmark("./manga/Vol1.html", &second)
            .await
            .unwrap();

        assert_eq!(after.len(), 1);
        assert_eq!(after[0].page_idx, PageIndex::new(9));
    }

    #[tokio::test]
    async fn bookmark_delete_removes_only_matching_title() {
        let store = InMemoryStore::new();
        for (title, page) in [("one", 1), ("two", 2)] {
            store
                .upsert_bookmark(
                    "./manga/Vol1.html",
                    &Bookmark {
                        title: title.to_string(),
                        page_idx: PageIndex::new(page),
                    },
                )
                .await
                .unwrap();
        }

        store
            .delete_bookmark("/static/manga/Vol1.html", "one")
            .await
            .unwrap();

        let set = store.bookmarks_for("./manga/Vol1.html").await.unwrap();
        assert_eq!(set.bookmarks.len(), 1);
        assert_eq!(set.bookmarks[0].title, "two");
    }
}
