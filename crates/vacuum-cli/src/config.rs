//! Settings resolution: TOML file plus command-line overrides.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use vacuum_engine::VacuumConfig;

/// Settings file contents. Every field is optional; flags fill the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory to scan
    pub root_dir: Option<PathBuf>,

    /// Archive root
    pub target_dir: Option<PathBuf>,

    /// Descend into subdirectories
    pub recursive: Option<bool>,

    /// Dry-run mode
    pub dry_run: Option<bool>,

    /// Delete originals after copying
    pub shred_original: Option<bool>,

    /// Minimum age in years
    pub min_age_years: Option<u32>,

    /// Skip writing journal files
    pub no_log: Option<bool>,

    /// Journal base directory
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    /// Parse settings from TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Could not read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Directory to scan
    pub root_dir: PathBuf,

    /// Engine configuration
    pub vacuum: VacuumConfig,

    /// Journal base directory; `None` disables the journal
    pub log_dir: Option<PathBuf>,

    /// Skip the zero-age confirmation
    pub assume_yes: bool,
}

impl RunSettings {
    /// Merge command-line flags over file settings.
    pub fn resolve(cli: &Cli, file: Settings) -> Result<Self> {
        let root_dir = cli
            .root_dir
            .clone()
            .or(file.root_dir)
            .ok_or_else(|| CliError::MissingArgument("--root-dir".to_string()))?;
        let target_dir = cli
            .target_dir
            .clone()
            .or(file.target_dir)
            .ok_or_else(|| CliError::MissingArgument("--target-dir".to_string()))?;

        let defaults = VacuumConfig::new(target_dir);
        let vacuum = VacuumConfig {
            recursive: cli.recursive.or(file.recursive).unwrap_or(defaults.recursive),
            dry_run: cli.dry || file.dry_run.unwrap_or(defaults.dry_run),
            shred_original: cli.shred || file.shred_original.unwrap_or(defaults.shred_original),
            min_age_years: cli
                .older_than
                .or(file.min_age_years)
                .unwrap_or(defaults.min_age_years),
            ..defaults
        };

        let no_log = cli.nolog || file.no_log.unwrap_or(false);
        let log_dir = if no_log {
            None
        } else {
            Some(
                cli.log_dir
                    .clone()
                    .or(file.log_dir)
                    .unwrap_or_else(|| PathBuf::from(".")),
            )
        };

        Ok(Self {
            root_dir,
            vacuum,
            log_dir,
            assume_yes: cli.yes,
        })
    }
}
