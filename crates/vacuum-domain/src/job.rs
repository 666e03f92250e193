//! Copy jobs: one eligible file on its way into the archive

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Callback invoked exactly once per job, after execution, with the final job state
pub type JobCallback = Arc<dyn Fn(&CopyJob) + Send + Sync>;

/// Step of a live copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyStage {
    /// Creating the destination's parent directory tree
    CreateParent,
    /// Opening the original for reading
    OpenSource,
    /// Creating (or truncating) the destination
    CreateDestination,
    /// Streaming bytes from source to destination
    Stream,
    /// Flushing the destination to durable storage
    Flush,
}

impl CopyStage {
    /// Human-readable name of the step
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStage::CreateParent => "creating parent directory",
            CopyStage::OpenSource => "opening source",
            CopyStage::CreateDestination => "creating destination",
            CopyStage::Stream => "streaming",
            CopyStage::Flush => "flushing",
        }
    }
}

impl fmt::Display for CopyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a copy job failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFailure {
    /// Step that failed
    pub stage: CopyStage,
    /// Description of the underlying error
    pub message: String,
}

impl fmt::Display for CopyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.message)
    }
}

/// Where a job stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Enqueued, not yet executed
    Pending,
    /// Copied in full (or skipped by a dry run)
    Copied,
    /// Aborted at some step; `bytes_copied` still holds the partial progress
    Failed(CopyFailure),
}

/// A single file scheduled for archiving
///
/// Created by the scanner, owned by the copy engine from enqueue until its
/// callback returns. Only the worker executing the job mutates it.
pub struct CopyJob {
    /// Original file
    pub source: PathBuf,
    /// Mirrored path under the target root
    pub destination: PathBuf,
    /// Delete the original once the copy succeeded
    pub shred_on_finish: bool,
    /// Bytes written to the destination, filled in during execution
    pub bytes_copied: u64,
    /// Outcome of the job
    pub status: JobStatus,
    on_finish: JobCallback,
}

impl CopyJob {
    /// Create a pending job
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        shred_on_finish: bool,
        on_finish: JobCallback,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            shred_on_finish,
            bytes_copied: 0,
            status: JobStatus::Pending,
            on_finish,
        }
    }

    /// Whether the copy completed without error
    pub fn succeeded(&self) -> bool {
        self.status == JobStatus::Copied
    }

    /// The failure, if the job failed
    pub fn failure(&self) -> Option<&CopyFailure> {
        match &self.status {
            JobStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Mark the job as failed at `stage`
    pub fn fail(&mut self, stage: CopyStage, err: impl fmt::Display) {
        self.status = JobStatus::Failed(CopyFailure {
            stage,
            message: err.to_string(),
        });
    }

    /// Hand the finished job to its completion callback
    ///
    /// Consumes the job, so the callback can run at most once.
    pub fn finish(self) {
        let callback = Arc::clone(&self.on_finish);
        callback(&self);
    }
}

impl fmt::Debug for CopyJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyJob")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("shred_on_finish", &self.shred_on_finish)
            .field("bytes_copied", &self.bytes_copied)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
