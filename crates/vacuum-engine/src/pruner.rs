//! Upward removal of directories emptied by shredding

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use vacuum_domain::VacuumError;

/// File that does not keep a directory alive on its own (Windows thumbnail cache)
pub const RESIDUAL_ARTIFACT: &str = "Thumbs.db";

/// Outcome of one pruning walk
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Directories removed, deepest first
    pub removed: Vec<PathBuf>,
    /// Failure that stopped the walk, if any
    pub error: Option<VacuumError>,
}

/// Removes empty directories from a starting point upwards
#[derive(Debug, Clone, Copy, Default)]
pub struct Pruner;

impl Pruner {
    /// Create a pruner
    pub fn new() -> Self {
        Self
    }

    /// Walk up from `start`, removing every directory that is empty or only
    /// holds the residual artifact
    ///
    /// Stops at the first non-empty directory, at the first listing or removal
    /// failure, or at the filesystem root.
    pub fn prune(&self, start: &Path) -> PruneReport {
        let mut report = PruneReport::default();
        let mut current = Some(start);

        while let Some(dir) = current {
            match self.remove_if_empty(dir) {
                Ok(true) => {
                    tracing::debug!("Pruned empty directory {}", dir.display());
                    report.removed.push(dir.to_path_buf());
                    current = dir.parent().filter(|parent| !parent.as_os_str().is_empty());
                }
                Ok(false) => break,
                Err(err) => {
                    tracing::warn!("{}", err);
                    report.error = Some(err);
                    break;
                }
            }
        }

        report
    }

    /// Remove `dir` if nothing but the residual artifact is left in it
    fn remove_if_empty(&self, dir: &Path) -> Result<bool, VacuumError> {
        let mut names = Vec::with_capacity(2);
        for entry in fs::read_dir(dir).map_err(|e| VacuumError::prune(dir, e))? {
            let entry = entry.map_err(|e| VacuumError::prune(dir, e))?;
            names.push(entry.file_name());
            if names.len() > 1 {
                return Ok(false);
            }
        }

        if let Some(name) = names.first() {
            if name.as_os_str() != OsStr::new(RESIDUAL_ARTIFACT) {
                return Ok(false);
            }
            let artifact = dir.join(RESIDUAL_ARTIFACT);
            fs::remove_file(&artifact).map_err(|e| VacuumError::prune(&artifact, e))?;
        }

        fs::remove_dir(dir).map_err(|e| VacuumError::prune(dir, e))?;
        Ok(true)
    }
}
