use std::sync::Arc;
use std::time::Duration;

use storage::repository::ProgressStore;
use tokio::time::MissedTickBehavior;

use super::service::{ProgressSync, ResumeOutcome};
use crate::error::SyncError;
use crate::viewer::PageViewer;

/// Fixed polling period of the reference behavior.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Orchestrates the one-time resume and the recurring poll-and-report loop.
pub struct SyncLoopService {
    store: Arc<dyn ProgressStore>,
    viewer: Arc<dyn PageViewer>,
    sync: ProgressSync,
    poll_interval: Duration,
}

impl SyncLoopService {
    #[must_use]
    pub fn new(
        store: Arc<dyn ProgressStore>,
        viewer: Arc<dyn PageViewer>,
        sync: ProgressSync,
    ) -> Self {
        Self {
            store,
            viewer,
            sync,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Fetch recorded progress and jump the viewer to the last-read page.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` when the progress list cannot be fetched or
    /// decoded. Callers treat this as best-effort: [`run`](Self::run)
    /// logs the failure and starts polling anyway.
    pub async fn resume(&mut self) -> Result<ResumeOutcome, SyncError> {
        let entries = self.store.list_progress().await?;
        Ok(self.sync.apply_resume(&entries, self.viewer.as_ref()))
    }

    /// One polling tick.
    ///
    /// Observes the viewer and, when the page changed, hands the update to
    /// the store on a detached task. The dedup guard was already advanced
    /// by the observation, so a tick firing while the send is still in
    /// flight cannot re-send the same value; sends for different values
    /// are intentionally unordered. A failed send is logged and never
    /// retried — the store's latest-write view is all that matters.
    pub fn poll_tick(&mut self) {
        let Some(update) = self.sync.observe(self.viewer.as_ref()) else {
            return;
        };
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(err) = store.update_progress(&update).await {
                log::warn!(
                    "progress update for {} (page {}) failed: {err}",
                    update.path,
                    update.page_idx
                );
            }
        });
    }

    /// Resume once, then poll on a fixed period. Never returns; the task
    /// is dropped with the view.
    pub async fn run(mut self) {
        match self.resume().await {
            Ok(ResumeOutcome::Resumed(page)) => {
                log::info!(
                    "resumed {} at page {}",
                    self.sync.state().canonical_path(),
                    page.display_number()
                );
            }
            Ok(ResumeOutcome::NoProgress) => {
                log::debug!(
                    "no recorded progress for {}",
                    self.sync.state().canonical_path()
                );
            }
            Err(err) => log::warn!("progress resume failed: {err}"),
        }

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.poll_tick();
        }
    }
}
