#![forbid(unsafe_code)]

pub mod http;
pub mod repository;

pub use http::HttpStore;
pub use repository::{BookmarkStore, InMemoryStore, ProgressStore, Storage, StoreError};
