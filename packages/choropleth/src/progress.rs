//! Progress reporting for multi-year annotation runs.
//!
//! [`ProgressCallback`] keeps the sweep independent of how progress is
//! shown. The CLI plugs in `indicatif` bars; tests and library callers
//! use [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates from a year sweep.
pub trait ProgressCallback: Send + Sync {
    /// Set the total number of years to annotate.
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` years.
    fn inc(&self, delta: u64);

    /// Update the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Mark the sweep as complete with a final message.
    fn finish(&self, msg: String);

    /// Mark the sweep as complete and remove the indicator.
    fn finish_and_clear(&self);
}

/// Ignores every progress update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
