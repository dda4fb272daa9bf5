use serde::{Deserialize, Serialize};

use crate::model::page::PageIndex;
use crate::path::PathRoots;

/// One record in the server-side progress store.
///
/// `path` is kept in the store's canonical spelling and treated as opaque
/// here; comparisons always go through [`PathRoots::normalize`]. The store
/// keeps at most one entry per normalized path, and the list's given order
/// defines document adjacency for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub path: String,
    #[serde(default)]
    pub page_idx: PageIndex,
}

/// Payload for recording the last-read page of a document.
///
/// `last_page_idx` carries the viewer's page count, matching the wire
/// contract of `POST /update_progress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub path: String,
    pub page_idx: PageIndex,
    pub last_page_idx: u32,
}

/// Index of the first entry whose normalized path equals the normalized
/// `path`. First match wins; the store should never hold duplicates, but
/// if it does, first-in-list is the tie-break.
#[must_use]
pub fn position_of(entries: &[ProgressEntry], roots: &PathRoots, path: &str) -> Option<usize> {
    let needle = roots.normalize(path);
    entries
        .iter()
        .position(|entry| roots.normalize(&entry.path) == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, page: u32) -> ProgressEntry {
        ProgressEntry {
            path: path.to_string(),
            page_idx: PageIndex::new(page),
        }
    }

    #[test]
    fn position_matches_across_spellings() {
        let roots = PathRoots::default();
        let entries = vec![
            entry("./manga/Vol1.html", 0),
            entry("./manga/Vol2.html", 3),
        ];

        assert_eq!(
            position_of(&entries, &roots, "/static/manga/VOL2.html"),
            Some(1)
        );
        assert_eq!(position_of(&entries, &roots, "./manga/Vol3.html"), None);
    }

    #[test]
    fn first_match_wins_on_duplicates() {
        let roots = PathRoots::default();
        let entries = vec![entry("./manga/Vol1.html", 2), entry("manga/vol1.html", 9)];
        assert_eq!(position_of(&entries, &roots, "./manga/Vol1.html"), Some(0));
    }

    #[test]
    fn missing_page_idx_defaults_to_zero() {
        let parsed: ProgressEntry =
            serde_json::from_str(r#"{"path": "./manga/Vol1.html"}"#).unwrap();
        assert_eq!(parsed.page_idx, PageIndex::new(0));
    }

    #[test]
    fn tolerates_extra_store_fields() {
        let parsed: ProgressEntry = serde_json::from_str(
            r#"{"path": "./manga/Vol1.html", "page_idx": 4, "series": "Vol", "cover_page": "0.jpg"}"#,
        )
        .unwrap();
        assert_eq!(parsed.page_idx, PageIndex::new(4));
    }

    #[test]
    fn update_serializes_wire_field_names() {
        let update = ProgressUpdate {
            path: "./manga/Vol1.html".to_string(),
            page_idx: PageIndex::new(4),
            last_page_idx: 180,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["path"], "./manga/Vol1.html");
        assert_eq!(json["page_idx"], 4);
        assert_eq!(json["last_page_idx"], 180);
    }
}
