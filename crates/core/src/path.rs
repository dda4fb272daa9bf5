//! Path folding between server-recorded paths and viewer-reported ones.

const DEFAULT_STATIC_PREFIX: &str = "static";
const DEFAULT_DOCUMENT_ROOT: &str = "manga";

//
// ─── ROOTS ─────────────────────────────────────────────────────────────────────
//

/// Mount points that differ between the store's recorded paths and the
/// paths the viewer shell reports.
///
/// The server keeps documents relative to its static mount while the shell
/// exposes a served URL path; both segments are deployment-specific, so they
/// are configurable here. A mismatched root never fails loudly: lookups just
/// land in the "no recorded progress" branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRoots {
    static_prefix: String,
    document_root: String,
}

impl Default for PathRoots {
    fn default() -> Self {
        Self::new(DEFAULT_STATIC_PREFIX, DEFAULT_DOCUMENT_ROOT)
    }
}

impl PathRoots {
    /// Creates roots from the static-asset prefix and the document root.
    ///
    /// Surrounding slashes are tolerated; `"/static/"` and `"static"`
    /// configure the same prefix.
    #[must_use]
    pub fn new(static_prefix: impl Into<String>, document_root: impl Into<String>) -> Self {
        Self {
            static_prefix: trim_segment(&static_prefix.into()),
            document_root: trim_segment(&document_root.into()),
        }
    }

    #[must_use]
    pub fn static_prefix(&self) -> &str {
        &self.static_prefix
    }

    #[must_use]
    pub fn document_root(&self) -> &str {
        &self.document_root
    }

    /// Canonical comparison key for a document path.
    ///
    /// Folds backslashes to slashes, strips a slash-anchored static prefix,
    /// drops leading relative markers, and lower-cases the result. The fold
    /// is total, deterministic, and idempotent: two spellings of the same
    /// document always produce the same key, and distinct documents only
    /// collide if their raw paths already agree after this folding.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        self.route_for(raw).to_lowercase()
    }

    /// Server-relative route for a path, case preserved.
    ///
    /// Same folding as [`normalize`](Self::normalize) minus the case fold.
    /// Navigation targets are built from this form; lower-casing them could
    /// point the shell at a path the server never served.
    #[must_use]
    pub fn route_for(&self, raw: &str) -> String {
        let folded = fold_separators(raw);
        let stripped = strip_mount(&folded, &self.static_prefix).unwrap_or(&folded);
        strip_relative_markers(stripped).to_string()
    }

    /// Path reported to the store for the currently viewed document.
    ///
    /// Mirrors how the server records documents under its static mount: a
    /// path under `/{static_prefix}` trades the prefix for a relative
    /// marker, a path under `/{document_root}` gains one, and anything else
    /// passes through untouched.
    #[must_use]
    pub fn canonical_location(&self, decoded_path: &str) -> String {
        let folded = fold_separators(decoded_path);
        if let Some(tail) = strip_mount(&folded, &self.static_prefix) {
            return format!(".{tail}");
        }
        if strip_mount(&folded, &self.document_root).is_some() {
            return format!(".{folded}");
        }
        folded
    }
}

//
// ─── FOLDING HELPERS ───────────────────────────────────────────────────────────
//

fn trim_segment(raw: &str) -> String {
    raw.trim_matches(|c| c == '/' || c == '\\').to_string()
}

fn fold_separators(raw: &str) -> String {
    raw.replace('\\', "/")
}

/// Strips a slash-anchored `/{segment}` prefix, requiring a segment
/// boundary so `/staticfoo` is not mistaken for `/static/foo`.
fn strip_mount<'a>(path: &'a str, segment: &str) -> Option<&'a str> {
    if segment.is_empty() {
        return None;
    }
    let rest = path.strip_prefix('/')?;
    if rest.len() < segment.len() || !rest.is_char_boundary(segment.len()) {
        return None;
    }
    let (head, tail) = rest.split_at(segment.len());
    if !head.eq_ignore_ascii_case(segment) {
        return None;
    }
    if tail.is_empty() || tail.starts_with('/') {
        Some(tail)
    } else {
        None
    }
}

fn strip_relative_markers(path: &str) -> &str {
    let mut rest = path;
    loop {
        if let Some(tail) = rest.strip_prefix("./") {
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('/') {
            rest = tail;
        } else {
            return rest;
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
