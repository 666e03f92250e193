//! Depth-first scan of the source tree

use crate::age;
use crate::completion::RunContext;
use crate::{CopyEngine, VacuumConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vacuum_domain::{CopyJob, JobCallback, VacuumError};

/// Walks a source tree and submits every old-enough file to the copy engine
///
/// The walk itself is synchronous and single-threaded; entries are visited in
/// the order the filesystem reports them. Only the copy work is asynchronous.
pub(crate) struct Scanner<'a> {
    root: &'a Path,
    config: &'a VacuumConfig,
    current_year: i32,
    engine: &'a Arc<CopyEngine>,
    ctx: &'a RunContext,
    on_finish: JobCallback,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(
        root: &'a Path,
        config: &'a VacuumConfig,
        engine: &'a Arc<CopyEngine>,
        ctx: &'a RunContext,
        on_finish: JobCallback,
    ) -> Self {
        Self {
            root,
            config,
            current_year: age::current_year(),
            engine,
            ctx,
            on_finish,
        }
    }

    /// Scan the whole tree below the root
    pub(crate) fn run(&self) {
        self.scan_dir(self.root);
    }

    fn scan_dir(&self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.ctx.report_error(VacuumError::Scan {
                    path: dir.to_path_buf(),
                    message: format!("could not read directory: {}", e),
                });
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.ctx.report_error(VacuumError::Scan {
                        path: dir.to_path_buf(),
                        message: format!("could not read directory entry: {}", e),
                    });
                    continue;
                }
            };
            let path = entry.path();

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    self.ctx.report_error(VacuumError::Scan {
                        path,
                        message: format!("could not obtain file info: {}", e),
                    });
                    continue;
                }
            };

            if metadata.is_dir() {
                tracing::debug!("Found directory {}", path.display());
                if self.config.recursive {
                    self.scan_dir(&path);
                }
                continue;
            }

            if !is_regular_file(&path, &metadata) {
                tracing::debug!("Skipping {}: not a regular file", path.display());
                continue;
            }

            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    self.ctx.report_error(VacuumError::Scan {
                        path,
                        message: format!("could not obtain modification time: {}", e),
                    });
                    continue;
                }
            };

            tracing::trace!("Found file {}", path.display());
            if !age::is_eligible(modified, self.current_year, self.config.min_age_years) {
                continue;
            }

            self.submit(path);
        }
    }

    fn submit(&self, source: PathBuf) {
        let destination = self.destination_for(&source);
        tracing::debug!(
            "File {} is older than {} years",
            source.display(),
            self.config.min_age_years
        );
        self.ctx
            .recorder()
            .record_old_file_found(&source, self.config.min_age_years);

        // Count the job before the worker can possibly finish it.
        self.ctx.in_flight().increment();
        self.engine.enqueue(CopyJob::new(
            source,
            destination,
            self.config.shred_original,
            Arc::clone(&self.on_finish),
        ));
    }

    /// Mirror `source` (below the root) under the target root
    fn destination_for(&self, source: &Path) -> PathBuf {
        match source.strip_prefix(self.root) {
            Ok(relative) => self.config.target_dir.join(relative),
            Err(_) => self.config.target_dir.join(source.file_name().unwrap_or(source.as_os_str())),
        }
    }
}

/// Regular files, and symlinks pointing at one; pipes, sockets and devices are not
fn is_regular_file(path: &Path, metadata: &fs::Metadata) -> bool {
    if metadata.is_symlink() {
        return fs::metadata(path).map(|target| target.is_file()).unwrap_or(false);
    }
    metadata.is_file()
}
