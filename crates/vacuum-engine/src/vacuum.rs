//! Cleaning orchestrator: scan, wait for the copy queue, report

use crate::completion::RunContext;
use crate::scanner::Scanner;
use crate::{CopyEngine, InFlight, VacuumConfig};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use vacuum_domain::{EventRecorder, OperationStats, VacuumError};

/// Entry point for archiving runs
///
/// Owns the copy engine and the in-flight counter. A run scans the source tree,
/// waits until every submitted job has completed and returns the statistics.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use vacuum_domain::NoopRecorder;
/// use vacuum_engine::{Vacuum, VacuumConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let config = VacuumConfig {
///         min_age_years: 10,
///         shred_original: true,
///         ..VacuumConfig::new("/archive")
///     };
///     let vacuum = Vacuum::new(config);
///
///     let stats = vacuum.clean("/data/share", Arc::new(NoopRecorder)).await;
///     println!("{}", stats.summary());
/// }
/// ```
pub struct Vacuum {
    config: VacuumConfig,
    engine: Arc<CopyEngine>,
    in_flight: Arc<InFlight>,
    running: AtomicBool,
}

/// Holds the single-run slot; released when dropped, including on cancellation
struct RunSlot<'a>(&'a AtomicBool);

impl<'a> RunSlot<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for RunSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Vacuum {
    /// Create an orchestrator with its own copy engine
    pub fn new(config: VacuumConfig) -> Self {
        let engine = Arc::new(CopyEngine::new(config.dry_run));
        Self {
            config,
            engine,
            in_flight: Arc::new(InFlight::new()),
            running: AtomicBool::new(false),
        }
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &VacuumConfig {
        &self.config
    }

    /// Get a reference to the copy engine
    pub fn engine(&self) -> &Arc<CopyEngine> {
        &self.engine
    }

    /// Jobs submitted but not yet completed
    pub fn jobs_in_flight(&self) -> usize {
        self.in_flight.current()
    }

    /// Archive every eligible file below `root`
    ///
    /// Refuses to start while another run is scanning or waiting, or while jobs
    /// of a previous run are still in flight; the returned statistics then hold
    /// a single [`VacuumError::Busy`] and nothing on disk is touched. Otherwise the scan runs on a blocking task and this
    /// future resolves once the last job's completion has been processed.
    pub async fn clean(&self, root: impl AsRef<Path>, recorder: Arc<dyn EventRecorder>) -> OperationStats {
        let Some(_slot) = RunSlot::acquire(&self.running) else {
            tracing::warn!("Refusing to clean {}: another run is active", root.as_ref().display());
            return OperationStats::rejected(VacuumError::Busy);
        };
        if !self.in_flight.is_idle() {
            tracing::warn!(
                "Refusing to clean {}: {} copy jobs still in flight",
                root.as_ref().display(),
                self.in_flight.current()
            );
            return OperationStats::rejected(VacuumError::Busy);
        }

        let root = root.as_ref().to_path_buf();
        let start = Instant::now();
        tracing::info!(
            "Cleaning directory {} into {} (recursive: {}, dry run: {}, shred: {}, older than: {} years)",
            root.display(),
            self.config.target_dir.display(),
            self.config.recursive,
            self.config.dry_run,
            self.config.shred_original,
            self.config.min_age_years
        );

        let ctx = Arc::new(RunContext::new(
            recorder,
            Arc::clone(&self.in_flight),
            self.config.dry_run,
        ));

        let scan = {
            let root = root.clone();
            let config = self.config.clone();
            let engine = Arc::clone(&self.engine);
            let ctx = Arc::clone(&ctx);
            tokio::task::spawn_blocking(move || {
                let on_finish = ctx.callback();
                Scanner::new(&root, &config, &engine, &ctx, on_finish).run();
            })
        };

        if let Err(e) = scan.await {
            ctx.report_error(VacuumError::scan(&root, format!("scanner task failed: {}", e)));
        }

        tracing::debug!("Scan finished, waiting for {} copy jobs", self.in_flight.current());
        self.in_flight.wait_idle().await;

        let stats = ctx.snapshot();
        tracing::info!(
            "Cleaning finished in {:?}: {} files copied ({} bytes), {} deleted, {} errors",
            start.elapsed(),
            stats.copied_files,
            stats.copied_bytes,
            stats.deleted_files,
            stats.error_count()
        );
        stats
    }
}
