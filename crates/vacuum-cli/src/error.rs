//! Error types for the CLI application.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required argument was given neither on the command line nor in the config file
    #[error("Missing required argument: {0}. Run with --help to see usage information")]
    MissingArgument(String),

    /// Directory does not exist or is not a directory
    #[error("Invalid {role} directory: {}", path.display())]
    InvalidDirectory {
        /// "source" or "target"
        role: &'static str,
        /// Offending path
        path: PathBuf,
    },

    /// Directory exists but cannot be written to
    #[error("Unwritable {role} directory {}: {reason}", path.display())]
    UnwritableDirectory {
        /// "source" or "target"
        role: &'static str,
        /// Offending path
        path: PathBuf,
        /// Underlying error description
        reason: String,
    },

    /// Target directory is the root directory or one of its ancestors
    #[error("Target directory {} must not be the root directory or contain it ({})", target.display(), root.display())]
    OverlappingDirectories {
        /// Directory to scan
        root: PathBuf,
        /// Archive root
        target: PathBuf,
    },

    /// Event recorder error
    #[error("Journal error: {0}")]
    Recorder(#[from] vacuum_domain::RecorderError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
