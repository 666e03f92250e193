//! CLI argument parsing.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Dust Vacuum - Scans a root directory for old files and copies them to a
/// target directory for archiving.
#[derive(Debug, Default, Parser)]
#[command(name = "vacuum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The root directory which should be scanned for old files [required]
    #[arg(long, value_name = "DIR")]
    pub root_dir: Option<PathBuf>,

    /// The target directory where the old files should be copied to [required]
    #[arg(long, value_name = "DIR")]
    pub target_dir: Option<PathBuf>,

    /// Whether all subdirectories should be included (default: true)
    #[arg(short, long, value_name = "BOOL", action = ArgAction::Set)]
    pub recursive: Option<bool>,

    /// Perform a dry run without any file operations
    #[arg(long)]
    pub dry: bool,

    /// Delete the original file after it was copied
    #[arg(long)]
    pub shred: bool,

    /// How old the last edit of a file should be (in years) to archive it (default: 11)
    #[arg(long, value_name = "YEARS")]
    pub older_than: Option<u32>,

    /// Do not write journal files for this run. Use at own risk only!
    #[arg(long)]
    pub nolog: bool,

    /// Directory below which the per-run journal is written (default: current directory)
    #[arg(long, value_name = "DIR", env = "VACUUM_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Settings file (TOML); command-line flags take precedence
    #[arg(short, long, value_name = "FILE", env = "VACUUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip the confirmation prompt when archiving regardless of age
    #[arg(short = 'y', long)]
    pub yes: bool,
}
