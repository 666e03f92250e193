//! Dust Vacuum CLI library.
//!
//! Argument parsing, settings resolution, directory validation and the run
//! driver behind the `vacuum` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod validate;

pub use cli::Cli;
pub use config::{RunSettings, Settings};
pub use error::{CliError, Result};
