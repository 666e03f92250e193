//! Trait definitions for external interactions
//!
//! The engine reports every notable event through [`EventRecorder`]. Concrete
//! recorders live in other crates (vacuum-journal writes them to disk).

use crate::RecorderError;
use std::path::Path;

/// Narrow event-recording interface consumed by the scanner, the completion
/// callbacks and the error paths
///
/// Methods take `&self` because events arrive from both the scanning thread and
/// the copy worker; implementations handle their own synchronization.
pub trait EventRecorder: Send + Sync {
    /// Prepare the recorder for a run
    fn open(&self) -> Result<(), RecorderError>;

    /// A file met the age threshold and was scheduled for archiving
    fn record_old_file_found(&self, path: &Path, min_age_years: u32);

    /// A file was copied into the archive
    fn record_copied(&self, source: &Path, destination: &Path, bytes: u64);

    /// Copying a file failed
    fn record_failed_copy(&self, source: &Path, destination: &Path, error: &str);

    /// An original was deleted after its copy succeeded
    fn record_shredded(&self, source: &Path);

    /// Deleting an original failed
    fn record_failed_shred(&self, source: &Path, error: &str);

    /// Any other error (scan and prune failures)
    fn record_generic_error(&self, error: &str);

    /// Release resources; the recorder cannot be reopened afterwards
    fn close(&self) -> Result<(), RecorderError>;
}

/// Recorder that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl EventRecorder for NoopRecorder {
    fn open(&self) -> Result<(), RecorderError> {
        Ok(())
    }

    fn record_old_file_found(&self, _path: &Path, _min_age_years: u32) {}

    fn record_copied(&self, _source: &Path, _destination: &Path, _bytes: u64) {}

    fn record_failed_copy(&self, _source: &Path, _destination: &Path, _error: &str) {}

    fn record_shredded(&self, _source: &Path) {}

    fn record_failed_shred(&self, _source: &Path, _error: &str) {}

    fn record_generic_error(&self, _error: &str) {}

    fn close(&self) -> Result<(), RecorderError> {
        Ok(())
    }
}
