//! Per-run completion handling: statistics, shredding and pruning

use crate::{InFlight, Pruner};
use std::fs;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use vacuum_domain::{CopyJob, EventRecorder, JobCallback, JobStatus, OperationStats, VacuumError};

/// Marks one job as done when dropped, also while unwinding
struct Completed<'a>(&'a InFlight);

impl Drop for Completed<'_> {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// State shared by the scanner and the completion callbacks of one run
pub(crate) struct RunContext {
    stats: Mutex<OperationStats>,
    recorder: Arc<dyn EventRecorder>,
    in_flight: Arc<InFlight>,
    pruner: Pruner,
    dry_run: bool,
}

impl RunContext {
    pub(crate) fn new(recorder: Arc<dyn EventRecorder>, in_flight: Arc<InFlight>, dry_run: bool) -> Self {
        Self {
            stats: Mutex::new(OperationStats::new()),
            recorder,
            in_flight,
            pruner: Pruner::new(),
            dry_run,
        }
    }

    pub(crate) fn recorder(&self) -> &dyn EventRecorder {
        self.recorder.as_ref()
    }

    pub(crate) fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Callback handed to every job of this run
    pub(crate) fn callback(self: &Arc<Self>) -> JobCallback {
        let ctx = Arc::clone(self);
        Arc::new(move |job: &CopyJob| ctx.finish_job(job))
    }

    /// Copy of the statistics collected so far
    pub(crate) fn snapshot(&self) -> OperationStats {
        self.lock_stats().clone()
    }

    /// Record a non-fatal error that was not caused by a copy job
    pub(crate) fn report_error(&self, err: VacuumError) {
        tracing::warn!("{}", err);
        self.recorder.record_generic_error(&err.to_string());
        self.lock_stats().record_error(err);
    }

    fn lock_stats(&self) -> MutexGuard<'_, OperationStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fold a finished job into the run
    ///
    /// Runs on the copy worker, so the next job waits until this returns.
    pub(crate) fn finish_job(&self, job: &CopyJob) {
        let _done = Completed(&self.in_flight);
        match &job.status {
            JobStatus::Copied => {
                tracing::info!(
                    "Finished copy job from {} to {} | Copied {} bytes",
                    job.source.display(),
                    job.destination.display(),
                    job.bytes_copied
                );
                self.lock_stats().record_copy(job.bytes_copied);
                self.recorder
                    .record_copied(&job.source, &job.destination, job.bytes_copied);

                if job.shred_on_finish && !self.dry_run {
                    self.shred(job);
                }
            }
            JobStatus::Failed(failure) => {
                tracing::warn!(
                    "Failed copy job from {} to {}: {}",
                    job.source.display(),
                    job.destination.display(),
                    failure
                );
                self.lock_stats().record_error(VacuumError::Copy {
                    origin: job.source.clone(),
                    destination: job.destination.clone(),
                    stage: failure.stage,
                    message: failure.message.clone(),
                });
                self.recorder
                    .record_failed_copy(&job.source, &job.destination, &failure.to_string());
            }
            JobStatus::Pending => {
                tracing::error!("Copy job for {} finished without running", job.source.display());
            }
        }
    }

    /// Delete the original of a copied job and prune what it leaves behind
    fn shred(&self, job: &CopyJob) {
        if let Err(e) = fs::remove_file(&job.source) {
            let err = VacuumError::shred(&job.source, &e);
            tracing::warn!("{}", err);
            self.recorder.record_failed_shred(&job.source, &e.to_string());
            self.lock_stats().record_error(err);
            return;
        }

        tracing::info!("Shredded file {}", job.source.display());
        self.lock_stats().record_deletion();
        self.recorder.record_shredded(&job.source);

        if let Some(parent) = job.source.parent() {
            if let Some(err) = self.pruner.prune(parent).error {
                self.recorder.record_generic_error(&err.to_string());
                self.lock_stats().record_error(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use vacuum_domain::{CopyStage, NoopRecorder, RecorderError};

    #[derive(Default)]
    struct CountingRecorder {
        events: Mutex<Vec<String>>,
    }

    impl CountingRecorder {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl EventRecorder for CountingRecorder {
        fn open(&self) -> Result<(), RecorderError> {
            Ok(())
        }
        fn record_old_file_found(&self, path: &Path, _min_age_years: u32) {
            self.push(format!("old {}", path.display()));
        }
        fn record_copied(&self, source: &Path, _destination: &Path, bytes: u64) {
            self.push(format!("copied {} {}", source.display(), bytes));
        }
        fn record_failed_copy(&self, source: &Path, _destination: &Path, _error: &str) {
            self.push(format!("failed-copy {}", source.display()));
        }
        fn record_shredded(&self, source: &Path) {
            self.push(format!("shredded {}", source.display()));
        }
        fn record_failed_shred(&self, source: &Path, _error: &str) {
            self.push(format!("failed-shred {}", source.display()));
        }
        fn record_generic_error(&self, _error: &str) {
            self.push("generic".to_string());
        }
        fn close(&self) -> Result<(), RecorderError> {
            Ok(())
        }
    }

    fn job(source: PathBuf, shred: bool, status: JobStatus, bytes: u64) -> CopyJob {
        let mut job = CopyJob::new(source, "/archive/x", shred, Arc::new(|_job: &CopyJob| {}));
        job.status = status;
        job.bytes_copied = bytes;
        job
    }

    fn context(recorder: Arc<dyn EventRecorder>, dry_run: bool) -> (RunContext, Arc<InFlight>) {
        let in_flight = Arc::new(InFlight::new());
        (RunContext::new(recorder, Arc::clone(&in_flight), dry_run), in_flight)
    }

    #[test]
    fn test_success_counts_and_decrements() {
        let recorder = Arc::new(CountingRecorder::default());
        let (ctx, in_flight) = context(recorder.clone(), false);
        in_flight.increment();

        ctx.finish_job(&job(PathBuf::from("/src/a.txt"), false, JobStatus::Copied, 7));

        let stats = ctx.snapshot();
        assert_eq!(stats.copied_files, 1);
        assert_eq!(stats.copied_bytes, 7);
        assert_eq!(stats.deleted_files, 0);
        assert!(in_flight.is_idle());
        assert_eq!(recorder.events(), vec!["copied /src/a.txt 7".to_string()]);
    }

    #[test]
    fn test_failed_copy_keeps_original_and_records_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, b"x").unwrap();

        let recorder = Arc::new(CountingRecorder::default());
        let (ctx, in_flight) = context(recorder.clone(), false);
        in_flight.increment();

        let mut failed = job(source.clone(), true, JobStatus::Pending, 0);
        failed.fail(CopyStage::CreateDestination, "read-only filesystem");
        ctx.finish_job(&failed);

        let stats = ctx.snapshot();
        assert_eq!(stats.copied_files, 0);
        assert_eq!(stats.deleted_files, 0);
        assert!(matches!(
            stats.errors.as_slice(),
            [VacuumError::Copy { stage: CopyStage::CreateDestination, .. }]
        ));
        assert!(source.exists());
        assert!(in_flight.is_idle());
        assert_eq!(recorder.events(), vec![format!("failed-copy {}", source.display())]);
    }

    #[test]
    fn test_shred_deletes_original_and_prunes_parent() {
        let dir = tempfile::tempdir().unwrap();
        let leaf = dir.path().join("root/sub");
        fs::create_dir_all(&leaf).unwrap();
        fs::write(dir.path().join("root/keep.txt"), b"x").unwrap();
        let source = leaf.join("only.txt");
        fs::write(&source, b"old").unwrap();

        let recorder = Arc::new(CountingRecorder::default());
        let (ctx, in_flight) = context(recorder.clone(), false);
        in_flight.increment();

        ctx.finish_job(&job(source.clone(), true, JobStatus::Copied, 3));

        let stats = ctx.snapshot();
        assert_eq!(stats.deleted_files, 1);
        assert!(stats.errors.is_empty());
        assert!(!leaf.exists());
        assert!(dir.path().join("root/keep.txt").exists());
        assert_eq!(
            recorder.events(),
            vec![
                format!("copied {} 3", source.display()),
                format!("shredded {}", source.display()),
            ]
        );
    }

    #[test]
    fn test_failed_shred_records_error_without_pruning() {
        let dir = tempfile::tempdir().unwrap();
        let leaf = dir.path().join("sub");
        fs::create_dir(&leaf).unwrap();
        let source = leaf.join("vanished.txt");

        let recorder = Arc::new(CountingRecorder::default());
        let (ctx, in_flight) = context(recorder.clone(), false);
        in_flight.increment();

        ctx.finish_job(&job(source.clone(), true, JobStatus::Copied, 0));

        let stats = ctx.snapshot();
        assert_eq!(stats.copied_files, 1);
        assert_eq!(stats.deleted_files, 0);
        assert!(matches!(stats.errors.as_slice(), [VacuumError::Shred { .. }]));
        assert!(leaf.exists());
        assert!(in_flight.is_idle());
        assert_eq!(recorder.events()[1], format!("failed-shred {}", source.display()));
    }

    #[test]
    fn test_dry_run_never_shreds() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, b"x").unwrap();

        let (ctx, in_flight) = context(Arc::new(NoopRecorder), true);
        in_flight.increment();

        ctx.finish_job(&job(source.clone(), true, JobStatus::Copied, 0));

        let stats = ctx.snapshot();
        assert_eq!(stats.copied_files, 1);
        assert_eq!(stats.deleted_files, 0);
        assert!(source.exists());
    }

    struct PanickingRecorder;

    impl EventRecorder for PanickingRecorder {
        fn open(&self) -> Result<(), RecorderError> {
            Ok(())
        }
        fn record_old_file_found(&self, _path: &Path, _min_age_years: u32) {}
        fn record_copied(&self, _source: &Path, _destination: &Path, _bytes: u64) {
            panic!("recorder failed");
        }
        fn record_failed_copy(&self, _source: &Path, _destination: &Path, _error: &str) {}
        fn record_shredded(&self, _source: &Path) {}
        fn record_failed_shred(&self, _source: &Path, _error: &str) {}
        fn record_generic_error(&self, _error: &str) {}
        fn close(&self) -> Result<(), RecorderError> {
            Ok(())
        }
    }

    #[test]
    fn test_panicking_recorder_still_completes_job() {
        let (ctx, in_flight) = context(Arc::new(PanickingRecorder), false);
        in_flight.increment();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            ctx.finish_job(&job(PathBuf::from("/src/a.txt"), false, JobStatus::Copied, 3));
        }));

        assert!(outcome.is_err());
        assert!(in_flight.is_idle());
        assert_eq!(ctx.snapshot().copied_files, 1);
    }

    #[test]
    fn test_report_error_records_generic_event() {
        let recorder = Arc::new(CountingRecorder::default());
        let (ctx, _in_flight) = context(recorder.clone(), false);

        ctx.report_error(VacuumError::scan("/src/locked", "permission denied"));

        assert_eq!(ctx.snapshot().error_count(), 1);
        assert_eq!(recorder.events(), vec!["generic".to_string()]);
    }
}
