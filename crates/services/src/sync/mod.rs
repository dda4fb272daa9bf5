mod service;
mod state;
mod workflow;

// Public API of the sync subsystem.
pub use crate::error::SyncError;
pub use service::{ProgressSync, ResumeOutcome};
pub use state::SyncState;
pub use workflow::{DEFAULT_POLL_INTERVAL, SyncLoopService};
