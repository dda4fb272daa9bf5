#![forbid(unsafe_code)]

pub mod bookmark_service;
pub mod error;
pub mod navigation;
pub mod sync;
pub mod viewer;

pub use reader_core::PathRoots;

pub use error::{BookmarkError, NavigationError, SyncError};

pub use bookmark_service::BookmarkService;
pub use navigation::{NavOutcome, SiblingNavigatorService};
pub use sync::{DEFAULT_POLL_INTERVAL, ProgressSync, ResumeOutcome, SyncLoopService, SyncState};
pub use viewer::{PageViewer, SharedViewer};
