//! # Upload Pipeline
//!
//! Orchestrates publication of the manifest queue against the remote
//! platform, under the daily quota budget.
//!
//! ## Overview
//!
//! The pipeline is the only component with a scheduling loop; everything
//! else is called synchronously from it. For each item still pending it
//! runs the ordered sub-steps — primary upload, thumbnail, collection
//! membership — consulting the quota ledger before every chargeable call
//! and flushing durable state after every transition.
//!
//! ## Components
//!
//! - **Retry Executor** (`retry`): bounded retry with a fixed backoff
//!   schedule; the sole consumer of error retryability
//! - **Uploader** (`upload`): the per-item state machine and the outer
//!   scheduling loop, with single-item and dry-run modes
//! - **Playlist Reconciler** (`playlists`): one remote playlist per series,
//!   by local state, remote adoption, or creation; best-effort covers
//! - **Cover crop** (`cover`): centered-square crop for playlist covers
//! - **Report** (`report`): derived, rebuildable run report
//!
//! ## Execution model
//!
//! Strictly sequential awaits on one task. The only suspensions are the
//! retry backoff, the quota-reset wait, and the inter-item delay; durable
//! state is flushed before each next action, so killing the process at any
//! point is safe.

pub mod cover;
pub mod error;
pub mod playlists;
pub mod report;
pub mod retry;
pub mod upload;

pub use error::{PipelineError, Result};
pub use playlists::{PlannedAction, ReconcilePlan, ReconcileSummary, Reconciler};
pub use report::{generate_report, write_report, Report, ReportSummary, ReportVideo};
pub use retry::{with_retry, MAX_ATTEMPTS, RETRY_DELAYS};
pub use upload::{
    DryRunEntry, DryRunReport, PipelineConfig, RetrySummary, RunSummary, Uploader,
};
