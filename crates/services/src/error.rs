//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StoreError;

/// Errors emitted by progress synchronization.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors emitted by `SiblingNavigatorService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NavigationError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors emitted by `BookmarkService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BookmarkError {
    #[error("bookmark title cannot be empty")]
    EmptyTitle,
    #[error(transparent)]
    Store(#[from] StoreError),
}
