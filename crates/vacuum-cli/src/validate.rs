//! Pre-run directory checks.

use crate::error::{CliError, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Name of the probe file written to test writability
const PROBE_FILE: &str = ".vacuum-write-probe";

/// Check that `path` is an existing, writable directory.
///
/// Writability is tested by creating and removing a probe file.
pub fn check_directory(path: &Path, role: &'static str) -> Result<()> {
    if !path.is_dir() {
        return Err(CliError::InvalidDirectory {
            role,
            path: path.to_path_buf(),
        });
    }

    let probe = path.join(PROBE_FILE);
    let unwritable = |e: std::io::Error| CliError::UnwritableDirectory {
        role,
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe)
        .map_err(unwritable)?;
    fs::remove_file(&probe).map_err(unwritable)?;

    tracing::debug!("{} directory {} is usable", role, path.display());
    Ok(())
}

/// Check that the target is neither the root nor one of its ancestors.
///
/// Both paths are canonicalized first, so symlinks and `..` segments are resolved.
pub fn check_separate(root: &Path, target: &Path) -> Result<()> {
    let root = fs::canonicalize(root)?;
    let target = fs::canonicalize(target)?;
    if root.starts_with(&target) {
        return Err(CliError::OverlappingDirectories { root, target });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_writable_directory() {
        let dir = tempfile::tempdir().unwrap();
        check_directory(dir.path(), "source").unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = check_directory(&missing, "target").unwrap_err();
        assert!(matches!(err, CliError::InvalidDirectory { role: "target", .. }));
        assert!(err.to_string().contains("target"));
    }

    #[test]
    fn test_rejects_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, b"x").unwrap();

        let err = check_directory(&file, "source").unwrap_err();
        assert!(matches!(err, CliError::InvalidDirectory { role: "source", path } if path == file));
    }

    #[test]
    fn test_rejects_target_equal_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_separate(dir.path(), dir.path()).unwrap_err();
        assert!(matches!(err, CliError::OverlappingDirectories { .. }));
    }

    #[test]
    fn test_rejects_target_containing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("share/data");
        fs::create_dir_all(&root).unwrap();

        let err = check_separate(&root, dir.path()).unwrap_err();
        assert!(matches!(err, CliError::OverlappingDirectories { .. }));

        let dotted = root.join("..").join("..");
        assert!(check_separate(&root, &dotted).is_err());
    }

    #[test]
    fn test_accepts_target_inside_root_or_beside_it() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data");
        let beside = dir.path().join("archive");
        let inside = root.join("archive");
        fs::create_dir_all(&inside).unwrap();
        fs::create_dir_all(&beside).unwrap();

        check_separate(&root, &beside).unwrap();
        check_separate(&root, &inside).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_rejects_read_only_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // root ignores permission bits
        let writable = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(locked.join("check"))
            .is_ok();
        let result = check_directory(&locked, "target");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !writable {
            assert!(matches!(result, Err(CliError::UnwritableDirectory { role: "target", .. })));
        }
    }
}
