//! Background copy engine
//!
//! Owns a FIFO queue of [`CopyJob`]s and at most one worker draining it. The
//! worker is started on demand by [`CopyEngine::enqueue`] and exits as soon as
//! it finds the queue empty, so copies never overlap.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use vacuum_domain::{CopyJob, CopyStage, JobStatus};

/// Size of the buffer used to stream file contents
const COPY_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<CopyJob>,
    worker_active: bool,
}

/// Serialized executor for copy jobs
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use vacuum_domain::{CopyJob, JobCallback};
/// use vacuum_engine::CopyEngine;
///
/// #[tokio::main]
/// async fn main() {
///     let engine = Arc::new(CopyEngine::new(false));
///     let on_finish: JobCallback = Arc::new(|job: &CopyJob| {
///         println!("{} -> {}: {:?}", job.source.display(), job.destination.display(), job.status);
///     });
///
///     engine.enqueue(CopyJob::new("/data/old.txt", "/archive/old.txt", false, on_finish));
/// }
/// ```
#[derive(Debug)]
pub struct CopyEngine {
    state: Mutex<QueueState>,
    dry_run: bool,
}

impl CopyEngine {
    /// Create an engine; in dry-run mode jobs complete without touching the filesystem
    pub fn new(dry_run: bool) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            dry_run,
        }
    }

    /// Whether jobs are simulated instead of executed
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Jobs waiting for the worker (the one being executed is not counted)
    pub fn pending(&self) -> usize {
        self.lock_state().pending.len()
    }

    /// Whether a worker is currently draining the queue
    pub fn is_active(&self) -> bool {
        self.lock_state().worker_active
    }

    /// Append a job and make sure a worker is draining the queue
    ///
    /// Starts a worker on Tokio's blocking pool when none is active, so this
    /// must be called from within a Tokio runtime context.
    pub fn enqueue(self: &Arc<Self>, job: CopyJob) {
        let mut state = self.lock_state();
        tracing::debug!(
            "Enqueued copy job {} -> {}",
            job.source.display(),
            job.destination.display()
        );
        state.pending.push_back(job);

        if !state.worker_active {
            state.worker_active = true;
            let engine = Arc::clone(self);
            tokio::task::spawn_blocking(move || engine.drain());
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Worker loop: pop, execute, report, until the queue is empty
    fn drain(&self) {
        tracing::trace!("Copy worker started");
        loop {
            let next = {
                let mut state = self.lock_state();
                match state.pending.pop_front() {
                    Some(job) => job,
                    None => {
                        state.worker_active = false;
                        break;
                    }
                }
            };

            let source = next.source.clone();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.execute(next).finish()));
            if outcome.is_err() {
                tracing::error!("Copy job for {} panicked, continuing with the next job", source.display());
            }
        }
        tracing::trace!("Copy worker stopped");
    }

    /// Run a single job and return it with its final status
    pub fn execute(&self, mut job: CopyJob) -> CopyJob {
        if self.dry_run {
            tracing::info!(
                "DRY RUN: Would copy {} to {}",
                job.source.display(),
                job.destination.display()
            );
            job.bytes_copied = 0;
            job.status = JobStatus::Copied;
            return job;
        }

        match copy_file(&mut job) {
            Ok(()) => job.status = JobStatus::Copied,
            Err((stage, err)) => job.fail(stage, err),
        }
        job
    }
}

/// Copy `job.source` to `job.destination`, keeping `job.bytes_copied` current
fn copy_file(job: &mut CopyJob) -> Result<(), (CopyStage, std::io::Error)> {
    if let Some(parent) = job.destination.parent() {
        fs::create_dir_all(parent).map_err(|e| (CopyStage::CreateParent, e))?;
    }

    if is_same_file(&job.source, &job.destination) {
        let err = io::Error::new(ErrorKind::InvalidInput, "destination is the source file itself");
        return Err((CopyStage::CreateDestination, err));
    }

    let mut reader = File::open(&job.source).map_err(|e| (CopyStage::OpenSource, e))?;
    let mut writer = File::create(&job.destination).map_err(|e| (CopyStage::CreateDestination, e))?;

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err((CopyStage::Stream, e)),
        };
        writer
            .write_all(&buffer[..read])
            .map_err(|e| (CopyStage::Stream, e))?;
        job.bytes_copied += read as u64;
    }

    writer.sync_all().map_err(|e| (CopyStage::Flush, e))
}

/// Whether both paths resolve to the same existing file
fn is_same_file(source: &Path, destination: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(source), Ok(destination)) => source == destination,
        _ => false,
    }
}
