//! Shared helpers for vacuum-engine integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};
use vacuum_domain::{EventRecorder, RecorderError};

const YEAR: Duration = Duration::from_secs(365 * 24 * 3600);

/// Write `contents` to `path` (creating parents) and backdate it by `years`
pub fn write_aged(path: &Path, contents: &[u8], years: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();

    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - YEAR * years).unwrap();
}

/// All regular files below `root`, relative to it
pub fn files_under(root: &Path) -> BTreeSet<PathBuf> {
    let mut found = BTreeSet::new();
    if !root.exists() {
        return found;
    }
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                found.insert(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }
    found
}

/// Build a set of relative paths
pub fn set(paths: &[&str]) -> BTreeSet<PathBuf> {
    paths.iter().map(PathBuf::from).collect()
}

/// Event captured by [`RecordingRecorder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    OldFile(PathBuf),
    Copied(PathBuf, PathBuf, u64),
    FailedCopy(PathBuf),
    Shredded(PathBuf),
    FailedShred(PathBuf),
    Generic(String),
}

/// Recorder keeping every event in memory
#[derive(Default)]
pub struct RecordingRecorder {
    events: Mutex<Vec<Event>>,
}

impl RecordingRecorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, matcher: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|event| matcher(event)).count()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl EventRecorder for RecordingRecorder {
    fn open(&self) -> Result<(), RecorderError> {
        Ok(())
    }

    fn record_old_file_found(&self, path: &Path, _min_age_years: u32) {
        self.push(Event::OldFile(path.to_path_buf()));
    }

    fn record_copied(&self, source: &Path, destination: &Path, bytes: u64) {
        self.push(Event::Copied(source.to_path_buf(), destination.to_path_buf(), bytes));
    }

    fn record_failed_copy(&self, source: &Path, _destination: &Path, _error: &str) {
        self.push(Event::FailedCopy(source.to_path_buf()));
    }

    fn record_shredded(&self, source: &Path) {
        self.push(Event::Shredded(source.to_path_buf()));
    }

    fn record_failed_shred(&self, source: &Path, _error: &str) {
        self.push(Event::FailedShred(source.to_path_buf()));
    }

    fn record_generic_error(&self, error: &str) {
        self.push(Event::Generic(error.to_string()));
    }

    fn close(&self) -> Result<(), RecorderError> {
        Ok(())
    }
}
