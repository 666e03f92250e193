//! Dust Vacuum Domain Layer
//!
//! Value types and trait interfaces shared by every Dust Vacuum crate. Nothing in
//! here touches the filesystem; the engine, journal and CLI crates build on top.
//!
//! ## Key Concepts
//!
//! - **Copy job**: one unit of work moving a single eligible file to its archive path
//! - **Operation stats**: counters and ordered errors collected over one run
//! - **Event recorder**: the narrow interface through which runs report what they did
//! - **Vacuum error**: the non-fatal failure kinds a run accumulates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod job;
pub mod stats;
pub mod traits;

// Re-exports for convenience
pub use error::{RecorderError, VacuumError};
pub use job::{CopyFailure, CopyJob, CopyStage, JobCallback, JobStatus};
pub use stats::OperationStats;
pub use traits::{EventRecorder, NoopRecorder};
