//! Dust Vacuum Engine
//!
//! Asynchronous archiving engine: finds files that have not been modified for a
//! number of years, copies them into a mirrored tree below an archive root, and
//! optionally deletes the originals and prunes the directories left empty.
//!
//! # Overview
//!
//! - **Scanner**: synchronous depth-first walk applying the age predicate
//! - **Copy engine**: FIFO queue drained by at most one background worker
//! - **Completion**: per-job statistics, shredding and pruning
//! - **Pruner**: removes emptied directories from the bottom up
//! - **Vacuum**: the orchestrator tying a run together
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use vacuum_domain::NoopRecorder;
//! use vacuum_engine::{Vacuum, VacuumConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = VacuumConfig::from_file("vacuum.toml")?;
//!     let vacuum = Vacuum::new(config);
//!
//!     let stats = vacuum.clean("/data/share", Arc::new(NoopRecorder)).await;
//!     println!("{}", stats.summary());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! target_dir = "/archive"
//! recursive = true
//! dry_run = false
//! shred_original = false
//! min_age_years = 11
//! ```
//!
//! # Guarantees
//!
//! Copy jobs execute in submission order and never overlap. Every job's
//! completion runs exactly once, and a run only returns after the last one.
//! Scan, copy, shred and prune failures are collected in the returned
//! [`OperationStats`](vacuum_domain::OperationStats) instead of aborting the run.

#![warn(missing_docs)]

mod age;
mod completion;
mod config;
mod copier;
mod error;
mod pruner;
mod scanner;
mod tracker;
mod vacuum;

pub use age::{current_year, is_eligible, year_of};
pub use config::VacuumConfig;
pub use copier::CopyEngine;
pub use error::ConfigError;
pub use pruner::{PruneReport, Pruner, RESIDUAL_ARTIFACT};
pub use tracker::InFlight;
pub use vacuum::Vacuum;
