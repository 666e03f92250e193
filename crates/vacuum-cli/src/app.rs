//! Run driver shared by the binary and its tests.

use crate::cli::Cli;
use crate::config::{RunSettings, Settings};
use crate::error::Result;
use crate::validate::{check_directory, check_separate};
use std::sync::Arc;
use vacuum_domain::{EventRecorder, NoopRecorder, OperationStats};
use vacuum_engine::Vacuum;
use vacuum_journal::FileJournal;

/// Resolve the effective settings from flags and the optional settings file.
pub fn load_settings(cli: &Cli) -> Result<RunSettings> {
    let file = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    RunSettings::resolve(cli, file)
}

/// Validate the source and target directories before anything is touched.
pub fn validate(settings: &RunSettings) -> Result<()> {
    check_directory(&settings.root_dir, "source")?;
    check_directory(&settings.vacuum.target_dir, "target")?;
    check_separate(&settings.root_dir, &settings.vacuum.target_dir)
}

/// Recorder for the run: a [`FileJournal`] unless the journal is disabled.
pub fn recorder_for(settings: &RunSettings) -> Arc<dyn EventRecorder> {
    match &settings.log_dir {
        Some(dir) => Arc::new(FileJournal::new(dir)),
        None => {
            tracing::warn!("Journal disabled, no record of this run will be kept");
            Arc::new(NoopRecorder)
        }
    }
}

/// Open the recorder, archive the source tree and close the recorder.
///
/// A recorder that fails to close only loses its last entries; the statistics
/// of the completed run are still returned.
pub async fn archive(settings: &RunSettings, recorder: Arc<dyn EventRecorder>) -> Result<OperationStats> {
    recorder.open()?;

    let vacuum = Vacuum::new(settings.vacuum.clone());
    let stats = vacuum.clean(&settings.root_dir, Arc::clone(&recorder)).await;

    if let Err(e) = recorder.close() {
        tracing::warn!("Could not close journal: {}", e);
    }
    Ok(stats)
}
