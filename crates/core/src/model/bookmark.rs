use serde::{Deserialize, Serialize};

use crate::model::page::PageIndex;

/// A titled position within one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub title: String,
    #[serde(default)]
    pub page_idx: PageIndex,
}

/// All bookmarks recorded for one document path, as the store groups them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkSet {
    pub path: String,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_deserializes_without_bookmarks_field() {
        let parsed: BookmarkSet =
            serde_json::from_str(r#"{"path": "./manga/Vol1.html"}"#).unwrap();
        assert_eq!(parsed.path, "./manga/Vol1.html");
        assert!(parsed.bookmarks.is_empty());
    }

    #[test]
    fn bookmark_round_trips() {
        let bookmark = Bookmark {
            title: "cliffhanger".to_string(),
            page_idx: PageIndex::new(12),
        };
        let json = serde_json::to_string(&bookmark).unwrap();
        let back: Bookmark = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bookmark);
    }
}
