//! Statistics collected over one vacuum run

use crate::VacuumError;

/// Counters and errors gathered during a run
///
/// A fresh value is created at the start of every run. Errors keep their
/// detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationStats {
    /// Files copied into the archive
    pub copied_files: u64,

    /// Bytes copied into the archive
    pub copied_bytes: u64,

    /// Originals deleted after a successful copy
    pub deleted_files: u64,

    /// Non-fatal errors, in the order they were detected
    pub errors: Vec<VacuumError>,
}

impl OperationStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics for a run that was refused before it started
    pub fn rejected(err: VacuumError) -> Self {
        Self {
            errors: vec![err],
            ..Self::default()
        }
    }

    /// Record a successful copy
    pub fn record_copy(&mut self, bytes: u64) {
        self.copied_files += 1;
        self.copied_bytes += bytes;
    }

    /// Record a deleted original
    pub fn record_deletion(&mut self) {
        self.deleted_files += 1;
    }

    /// Record a non-fatal error
    pub fn record_error(&mut self, err: VacuumError) {
        self.errors.push(err);
    }

    /// Number of errors collected so far
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Finished process with following statistics:".to_string(),
            format!("Copied files: {}", self.copied_files),
            format!("Copied bytes: {}", self.copied_bytes),
            format!("Deleted files: {}", self.deleted_files),
            format!("Number of errors: {}", self.error_count()),
        ];

        for err in &self.errors {
            lines.push(format!("  - {}", err));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_stats_creation() {
        let stats = OperationStats::new();
        assert_eq!(stats.copied_files, 0);
        assert_eq!(stats.copied_bytes, 0);
        assert_eq!(stats.deleted_files, 0);
        assert_eq!(stats.error_count(), 0);
    }

    #[test]
    fn test_record_copy_and_deletion() {
        let mut stats = OperationStats::new();
        stats.record_copy(10);
        stats.record_copy(5);
        stats.record_deletion();

        assert_eq!(stats.copied_files, 2);
        assert_eq!(stats.copied_bytes, 15);
        assert_eq!(stats.deleted_files, 1);
    }

    #[test]
    fn test_rejected_holds_single_error() {
        let stats = OperationStats::rejected(VacuumError::Busy);
        assert_eq!(stats.errors, vec![VacuumError::Busy]);
        assert_eq!(stats.copied_files, 0);
        assert_eq!(stats.deleted_files, 0);
    }

    #[test]
    fn test_summary() {
        let mut stats = OperationStats::new();
        stats.record_copy(1024);
        stats.record_deletion();
        stats.record_error(VacuumError::shred("/src/a.txt", "busy"));

        let summary = stats.summary();
        assert!(summary.contains("Copied files: 1"));
        assert!(summary.contains("Copied bytes: 1024"));
        assert!(summary.contains("Deleted files: 1"));
        assert!(summary.contains("Number of errors: 1"));
        assert!(summary.contains("/src/a.txt"));
    }

    proptest! {
        #[test]
        fn prop_errors_keep_detection_order(names in proptest::collection::vec("[a-z]{1,8}", 0..20)) {
            let mut stats = OperationStats::new();
            for name in &names {
                stats.record_error(VacuumError::scan(name.as_str(), "unreadable"));
            }

            prop_assert_eq!(stats.error_count(), names.len());
            for (err, name) in stats.errors.iter().zip(&names) {
                match err {
                    VacuumError::Scan { path, .. } => prop_assert_eq!(path.to_str(), Some(name.as_str())),
                    other => prop_assert!(false, "unexpected error {:?}", other),
                }
            }
        }
    }
}
