//! HTTP adapter for the progress server.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use reader_core::model::{Bookmark, BookmarkSet, ProgressEntry, ProgressUpdate};

use crate::repository::{BookmarkStore, ProgressStore, StoreError};

/// Store adapter speaking the progress server's JSON endpoints.
///
/// Requests carry no timeout on purpose: the client's callers treat every
/// send as fire-and-forget and must tolerate late resolutions, so a hung
/// request only ever wastes its own task.
#[derive(Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}/{route}", self.base_url)
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_decode() {
        StoreError::Serialization(err.to_string())
    } else {
        StoreError::Connection(err.to_string())
    }
}

fn check_status(status: StatusCode) -> Result<(), StoreError> {
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound);
    }
    if !status.is_success() {
        return Err(StoreError::Status(status.as_u16()));
    }
    Ok(())
}

#[async_trait]
impl ProgressStore for HttpStore {
    async fn list_progress(&self) -> Result<Vec<ProgressEntry>, StoreError> {
        let response = self
            .client
            .get(self.endpoint("progress"))
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response.status())?;
        response.json().await.map_err(transport_error)
    }

    async fn update_progress(&self, update: &ProgressUpdate) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.endpoint("update_progress"))
            .json(update)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response.status())?;

        // The acknowledgement body is arbitrary JSON; parse and discard.
        response
            .json::<serde_json::Value>()
            .await
            .map_err(transport_error)?;
        Ok(())
    }
}

#[async_trait]
impl BookmarkStore for HttpStore {
    async fn bookmarks_for(&self, path: &str) -> Result<BookmarkSet, StoreError> {
        let response = self
            .client
            .get(self.endpoint("bookmarks"))
            .query(&[("path", path)])
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response.status())?;
        response.json().await.map_err(transport_error)
    }

    async fn upsert_bookmark(
        &self,
        path: &str,
        bookmark: &Bookmark,
    ) -> Result<Vec<Bookmark>, StoreError> {
        let payload = BookmarkWrite {
            path,
            title: &bookmark.title,
            page_idx: bookmark.page_idx.value(),
        };
        let response = self
            .client
            .post(self.endpoint("update_bookmark"))
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response.status())?;

        let body: BookmarkAck = response.json().await.map_err(transport_error)?;
        Ok(body.bookmarks)
    }

    async fn delete_bookmark(&self, path: &str, title: &str) -> Result<(), StoreError> {
        let payload = BookmarkDelete { path, title };
        let response = self
            .client
            .post(self.endpoint("delete_bookmark"))
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response.status())?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct BookmarkWrite<'a> {
    path: &'a str,
    title: &'a str,
    page_idx: u32,
}

#[derive(Debug, Serialize)]
struct BookmarkDelete<'a> {
    path: &'a str,
    title: &'a str,
}

#[derive(Debug, Deserialize)]
struct BookmarkAck {
    #[serde(default)]
    bookmarks: Vec<Bookmark>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_without_doubled_slashes() {
        let store = HttpStore::new("http://localhost:1506/");
        assert_eq!(store.endpoint("progress"), "http://localhost:1506/progress");
        assert_eq!(
            store.endpoint("update_progress"),
            "http://localhost:1506/update_progress"
        );
    }
}
