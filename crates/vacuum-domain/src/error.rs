//! Error kinds collected during a vacuum run

use crate::job::CopyStage;
use std::path::PathBuf;
use thiserror::Error;

/// Failures a vacuum run can report
///
/// Everything except [`VacuumError::Busy`] is non-fatal: the run records the
/// error in its statistics and moves on to the next entry or job. Messages are
/// stored as strings so the collected errors can be cloned into snapshots.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VacuumError {
    /// Directory unreadable or file metadata unavailable while scanning
    #[error("Scan error at {}: {message}", path.display())]
    Scan {
        /// Entry that could not be read
        path: PathBuf,
        /// Underlying error description
        message: String,
    },

    /// Copying a file into the archive failed
    #[error("Copy error ({stage}) from {} to {}: {message}", origin.display(), destination.display())]
    Copy {
        /// Original file
        origin: PathBuf,
        /// Archive destination
        destination: PathBuf,
        /// Step at which the copy failed
        stage: CopyStage,
        /// Underlying error description
        message: String,
    },

    /// Deleting the original after a successful copy failed
    #[error("Shred error at {}: {message}", path.display())]
    Shred {
        /// Original file that could not be removed
        path: PathBuf,
        /// Underlying error description
        message: String,
    },

    /// Listing or removing a directory while pruning failed
    #[error("Prune error at {}: {message}", path.display())]
    Prune {
        /// Directory the pruner stopped at
        path: PathBuf,
        /// Underlying error description
        message: String,
    },

    /// A run was requested while copy jobs from a previous run are in flight
    #[error("Can't perform cleaning while copy jobs are still running")]
    Busy,
}

impl VacuumError {
    /// Build a scan error from any displayable failure
    pub fn scan(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        VacuumError::Scan {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Build a shred error from any displayable failure
    pub fn shred(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        VacuumError::Shred {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Build a prune error from any displayable failure
    pub fn prune(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        VacuumError::Prune {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Errors raised by an [`EventRecorder`](crate::EventRecorder) lifecycle call
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Underlying I/O failure (creating the log directory or files)
    #[error("Recorder I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The recorder was closed and cannot be reopened
    #[error("Recorder already finished and became unusable")]
    Finished,
}
