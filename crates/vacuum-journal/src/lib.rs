//! Dust Vacuum Journal
//!
//! Persists the events of a run as plain text. Every run gets its own
//! directory, named after the local time the journal was opened, holding six
//! append-only logs:
//!
//! | File              | Event                                  |
//! |-------------------|----------------------------------------|
//! | `old_files_found` | file met the age threshold             |
//! | `copied_files`    | file copied into the archive           |
//! | `copy_errors`     | copy failed                            |
//! | `shredded_files`  | original deleted after copying         |
//! | `shred_errors`    | deleting the original failed           |
//! | `generic_errors`  | scan and prune failures                |
//!
//! # Usage
//!
//! ```no_run
//! use vacuum_domain::EventRecorder;
//! use vacuum_journal::FileJournal;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let journal = FileJournal::new("logs");
//! journal.open()?;
//! journal.record_shredded(std::path::Path::new("/data/old.txt"));
//! journal.close()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use vacuum_domain::{EventRecorder, RecorderError};

/// Format of the per-run directory name
const RUN_DIR_FORMAT: &str = "%Y-%m-%d_%H-%M-%S%.3f";

/// The six logs written per run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    /// Files that met the age threshold
    OldFiles,
    /// Successful copies
    Copied,
    /// Failed copies
    CopyErrors,
    /// Deleted originals
    Shredded,
    /// Failed deletions
    ShredErrors,
    /// Everything else
    GenericErrors,
}

impl LogKind {
    /// Every log, in creation order
    pub const ALL: [LogKind; 6] = [
        LogKind::OldFiles,
        LogKind::Copied,
        LogKind::CopyErrors,
        LogKind::Shredded,
        LogKind::ShredErrors,
        LogKind::GenericErrors,
    ];

    /// File name of the log inside the run directory
    pub fn file_name(&self) -> &'static str {
        match self {
            LogKind::OldFiles => "old_files_found",
            LogKind::Copied => "copied_files",
            LogKind::CopyErrors => "copy_errors",
            LogKind::Shredded => "shredded_files",
            LogKind::ShredErrors => "shred_errors",
            LogKind::GenericErrors => "generic_errors",
        }
    }

    fn index(&self) -> usize {
        match self {
            LogKind::OldFiles => 0,
            LogKind::Copied => 1,
            LogKind::CopyErrors => 2,
            LogKind::Shredded => 3,
            LogKind::ShredErrors => 4,
            LogKind::GenericErrors => 5,
        }
    }
}

struct OpenLogs {
    run_dir: PathBuf,
    files: Vec<File>,
}

enum JournalState {
    Unopened,
    Open(OpenLogs),
    Finished,
}

/// [`EventRecorder`] writing one directory of logs per run
pub struct FileJournal {
    base_dir: PathBuf,
    state: Mutex<JournalState>,
}

impl FileJournal {
    /// Create a journal whose run directories live below `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            state: Mutex::new(JournalState::Unopened),
        }
    }

    /// Directory holding the logs, once opened
    pub fn run_dir(&self) -> Option<PathBuf> {
        match &*self.lock_state() {
            JournalState::Open(logs) => Some(logs.run_dir.clone()),
            _ => None,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, JournalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn create_logs(&self) -> Result<OpenLogs, RecorderError> {
        fs::create_dir_all(&self.base_dir)?;
        let run_dir = self
            .base_dir
            .join(Local::now().format(RUN_DIR_FORMAT).to_string());
        fs::create_dir(&run_dir)?;

        let mut files = Vec::with_capacity(LogKind::ALL.len());
        for kind in LogKind::ALL {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(run_dir.join(kind.file_name()))?;
            files.push(file);
        }

        Ok(OpenLogs { run_dir, files })
    }

    /// Append one timestamped line to a log
    fn append(&self, kind: LogKind, line: String) {
        let mut state = self.lock_state();
        let logs = match &mut *state {
            JournalState::Open(logs) => logs,
            _ => {
                tracing::warn!("Journal not open, dropping {} entry: {}", kind.file_name(), line);
                return;
            }
        };

        let stamp = Local::now().to_rfc3339();
        if let Err(e) = writeln!(logs.files[kind.index()], "[{}] {}", stamp, line) {
            tracing::warn!("Could not write to {} log: {}", kind.file_name(), e);
        }
    }
}

impl EventRecorder for FileJournal {
    fn open(&self) -> Result<(), RecorderError> {
        let mut state = self.lock_state();
        match *state {
            JournalState::Open(_) => return Ok(()),
            JournalState::Finished => return Err(RecorderError::Finished),
            JournalState::Unopened => {}
        }

        let logs = self.create_logs()?;
        tracing::info!("Writing journal to {}", logs.run_dir.display());
        *state = JournalState::Open(logs);
        Ok(())
    }

    fn record_old_file_found(&self, path: &Path, min_age_years: u32) {
        self.append(
            LogKind::OldFiles,
            format!("Found file {} being older than {} years", path.display(), min_age_years),
        );
    }

    fn record_copied(&self, source: &Path, destination: &Path, bytes: u64) {
        self.append(
            LogKind::Copied,
            format!(
                "Copied {} bytes from {} to {}",
                bytes,
                source.display(),
                destination.display()
            ),
        );
    }

    fn record_failed_copy(&self, source: &Path, destination: &Path, error: &str) {
        self.append(
            LogKind::CopyErrors,
            format!(
                "Could not copy file {} to {}: {}",
                source.display(),
                destination.display(),
                error
            ),
        );
    }

    fn record_shredded(&self, source: &Path) {
        self.append(LogKind::Shredded, format!("Shredded file {}", source.display()));
    }

    fn record_failed_shred(&self, source: &Path, error: &str) {
        self.append(
            LogKind::ShredErrors,
            format!("Could not shred file {}: {}", source.display(), error),
        );
    }

    fn record_generic_error(&self, error: &str) {
        self.append(LogKind::GenericErrors, error.to_string());
    }

    fn close(&self) -> Result<(), RecorderError> {
        let previous = std::mem::replace(&mut *self.lock_state(), JournalState::Finished);
        if let JournalState::Open(logs) = previous {
            for file in &logs.files {
                file.sync_all()?;
            }
        }
        Ok(())
    }
}
