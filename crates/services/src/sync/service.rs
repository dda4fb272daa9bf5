use reader_core::location::DocumentLocation;
use reader_core::model::{PageIndex, ProgressEntry, ProgressUpdate, position_of};
use reader_core::path::PathRoots;

use super::state::SyncState;
use crate::viewer::PageViewer;

//
// ─── RESUME ────────────────────────────────────────────────────────────────────
//

/// What the initial resume step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// A recorded entry matched; the viewer was jumped to this page.
    Resumed(PageIndex),
    /// No entry matched the current document; the viewer was left alone.
    NoProgress,
}

//
// ─── STATE MACHINE ─────────────────────────────────────────────────────────────
//

/// Per-view progress synchronization.
///
/// Owns the [`SyncState`] for one document view and applies the two state
/// transitions the protocol has: the one-time resume and the recurring
/// poll observation. All I/O stays with the caller; this type only decides
/// what, if anything, should be sent.
pub struct ProgressSync {
    roots: PathRoots,
    state: SyncState,
}

impl ProgressSync {
    /// Build sync state for the given document view.
    ///
    /// The canonical path is computed once from the location, and the page
    /// bound is read once from the viewer.
    #[must_use]
    pub fn new(roots: PathRoots, location: &DocumentLocation, viewer: &dyn PageViewer) -> Self {
        let canonical = roots.canonical_location(location.path());
        let state = SyncState::new(canonical, viewer.page_count());
        Self { roots, state }
    }

    #[must_use]
    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// Apply previously recorded progress to the viewer.
    ///
    /// Scans for the first entry whose normalized path equals the
    /// normalized canonical path. On a match the viewer jumps to the
    /// 1-based display number (the setter emits the change notification)
    /// and the dedup guard adopts the matched index, so the next poll
    /// tick does not re-report the resumed page. On no match the viewer
    /// is left untouched and nothing is written anywhere.
    pub fn apply_resume(
        &mut self,
        entries: &[ProgressEntry],
        viewer: &dyn PageViewer,
    ) -> ResumeOutcome {
        let Some(idx) = position_of(entries, &self.roots, self.state.canonical_path()) else {
            return ResumeOutcome::NoProgress;
        };
        let page = entries[idx].page_idx;
        viewer.set_page_number(page.display_number());
        self.state.mark_sent(page);
        ResumeOutcome::Resumed(page)
    }

    /// One poll observation of the viewer.
    ///
    /// Returns `None` when the page number is unreadable or unchanged
    /// since the last send. Otherwise the guard is updated first and the
    /// update to transmit is returned; with the guard already advanced, a
    /// later observation of the same value stays silent even while the
    /// transmission is still in flight. At-most-once per observed value,
    /// no retry.
    pub fn observe(&mut self, viewer: &dyn PageViewer) -> Option<ProgressUpdate> {
        let current = viewer
            .page_number()
            .and_then(PageIndex::from_display_number)?;
        if self.state.last_sent() == Some(current) {
            return None;
        }
        self.state.mark_sent(current);
        Some(ProgressUpdate {
            path: self.state.canonical_path().to_string(),
            page_idx: current,
            last_page_idx: self.state.total_pages(),
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::SharedViewer;

    fn entry(path: &str, page: u32) -> ProgressEntry {
        ProgressEntry {
            path: path.to_string(),
            page_idx: PageIndex::new(page),
        }
    }

    fn sync_for(path: &str, viewer: &SharedViewer) -> ProgressSync {
        let location = DocumentLocation::from_path(path).unwrap();
        ProgressSync::new(PathRoots::default(), &location, viewer)
    }

    #[test]
    fn resume_jumps_viewer_to_stored_page_plus_one() {
        let viewer = SharedViewer::new(180);
        let mut sync = sync_for("/static/manga/Vol1.html", &viewer);
        let entries = vec![entry("./manga/vol1.html", 4)];

        let outcome = sync.apply_resume(&entries, &viewer);

        assert_eq!(outcome, ResumeOutcome::Resumed(PageIndex::new(4)));
        assert_eq!(viewer.page_number(), Some(5));
        assert_eq!(viewer.change_count(), 1);
        assert_eq!(sync.state().last_sent(), Some(PageIndex::new(4)));
    }

    #[test]
    fn resume_without_match_leaves_viewer_alone() {
        let viewer = SharedViewer::new(180);
        let mut sync = sync_for("/static/manga/Vol9.html", &viewer);
        let entries = vec![entry("./manga/vol1.html", 4)];

        let outcome = sync.apply_resume(&entries, &viewer);

        assert_eq!(outcome, ResumeOutcome::NoProgress);
        assert_eq!(viewer.page_number(), Some(1));
        assert_eq!(viewer.change_count(), 0);
        assert_eq!(sync.state().last_sent(), None);
    }

    #[test]
    fn resumed_page_is_not_reobserved() {
        let viewer = SharedViewer::new(180);
        let mut sync = sync_for("/static/manga/Vol1.html", &viewer);
        sync.apply_resume(&[entry("./manga/vol1.html", 4)], &viewer);

        // The viewer now sits on the resumed page; nothing to send.
        assert_eq!(sync.observe(&viewer), None);
    }

    #[test]
    fn observe_dedups_unchanged_page() {
        let viewer = SharedViewer::new(180);
        let mut sync = sync_for("/manga/Vol1.html", &viewer);

        let first = sync.observe(&viewer);
        assert!(first.is_some());
        assert_eq!(sync.observe(&viewer), None);
        assert_eq!(sync.observe(&viewer), None);
    }

    #[test]
    fn observe_reports_each_new_page_exactly_once() {
        let viewer = SharedViewer::new(180);
        let mut sync = sync_for("/manga/Vol1.html", &viewer);
        sync.observe(&viewer);

        viewer.set_page_number(7);
        let update = sync.observe(&viewer).unwrap();
        assert_eq!(update.page_idx, PageIndex::new(6));
        assert_eq!(update.path, "./manga/Vol1.html");
        assert_eq!(update.last_page_idx, 180);

        // Guard advanced before any send settles.
        assert_eq!(sync.state().last_sent(), Some(PageIndex::new(6)));
        assert_eq!(sync.observe(&viewer), None);
    }

    #[test]
    fn observe_skips_unreadable_page() {
        let viewer = SharedViewer::unreadable(180);
        let mut sync = sync_for("/manga/Vol1.html", &viewer);
        assert_eq!(sync.observe(&viewer), None);
        assert_eq!(sync.state().last_sent(), None);
    }

    #[test]
    fn observe_skips_display_number_zero() {
        let viewer = SharedViewer::new(180);
        viewer.set_page_number(0);
        let mut sync = sync_for("/manga/Vol1.html", &viewer);
        assert_eq!(sync.observe(&viewer), None);
    }

    #[test]
    fn canonical_path_is_computed_once_from_location() {
        let viewer = SharedViewer::new(42);
        let sync = sync_for("/static/manga/Vol%201.html", &viewer);
        // from_path decoded the percent-encoding before canonicalization.
        assert_eq!(sync.state().canonical_path(), "./manga/Vol 1.html");
        assert_eq!(sync.state().total_pages(), 42);
    }
}
