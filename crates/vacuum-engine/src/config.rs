//! Configuration for vacuum runs
//!
//! Defines the archive location, the age threshold and the operational modes.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the [`Vacuum`](crate::Vacuum)
///
/// # Examples
///
/// ```
/// use vacuum_engine::VacuumConfig;
///
/// let config = VacuumConfig::new("/archive");
/// assert!(config.recursive);
/// assert_eq!(config.min_age_years, 11);
///
/// let config = VacuumConfig::from_toml_str(r#"
///     target_dir = "/archive"
///     min_age_years = 5
///     shred_original = true
/// "#).unwrap();
/// assert_eq!(config.min_age_years, 5);
/// assert!(config.shred_original);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacuumConfig {
    /// Root of the archive; scanned paths are mirrored below it
    pub target_dir: PathBuf,

    /// Descend into subdirectories
    /// Default: true
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Dry-run mode: scan and queue, but never touch the filesystem
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Delete originals after a successful copy and prune emptied directories
    /// Default: false
    #[serde(default)]
    pub shred_original: bool,

    /// Minimum age, in calendar years since the last modification
    /// Default: 11
    #[serde(default = "default_min_age_years")]
    pub min_age_years: u32,
}

fn default_recursive() -> bool {
    true
}

fn default_min_age_years() -> u32 {
    11
}

impl Default for VacuumConfig {
    fn default() -> Self {
        Self::new(PathBuf::new())
    }
}

impl VacuumConfig {
    /// Default configuration archiving into `target_dir`
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            recursive: default_recursive(),
            dry_run: false,
            shred_original: false,
            min_age_years: default_min_age_years(),
        }
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
