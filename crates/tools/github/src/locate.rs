//! Executable discovery in an extracted archive.

use setup_task_core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Find `name` at `root` or one directory below it.
///
/// `root/name` wins; otherwise immediate subdirectories are checked in
/// sorted order and the first match is returned. Deeper levels are not
/// searched.
///
/// # Errors
///
/// Returns [`Error::ExecutableNotFound`] naming `root` when no match exists
/// or `root` cannot be listed.
pub fn locate_executable(root: &Path, name: &str) -> Result<PathBuf> {
    let direct = root.join(name);
    if direct.is_file() {
        return Ok(direct);
    }

    let mut children: Vec<PathBuf> = std::fs::read_dir(root)
        .map_err(|_| Error::executable_not_found(name, root))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    children.sort();

    for child in children {
        let candidate = child.join(name);
        trace!(candidate = %candidate.display(), "Checking for executable");
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(Error::executable_not_found(name, root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locate_at_root() -> Result<()> {
        let temp = TempDir::new()?;
        std::fs::write(temp.path().join("task"), b"bin")?;
        std::fs::create_dir_all(temp.path().join("sub"))?;
        std::fs::write(temp.path().join("sub/task"), b"other")?;

        assert_eq!(locate_executable(temp.path(), "task")?, temp.path().join("task"));
        Ok(())
    }

    #[test]
    fn test_locate_one_level_deep() -> Result<()> {
        let temp = TempDir::new()?;
        std::fs::create_dir_all(temp.path().join("task_linux_amd64"))?;
        std::fs::write(temp.path().join("task_linux_amd64/task"), b"bin")?;

        assert_eq!(
            locate_executable(temp.path(), "task")?,
            temp.path().join("task_linux_amd64/task")
        );
        Ok(())
    }

    #[test]
    fn test_locate_first_sorted_child_wins() -> Result<()> {
        let temp = TempDir::new()?;
        for dir in ["zeta", "alpha", "mid"] {
            std::fs::create_dir_all(temp.path().join(dir))?;
            std::fs::write(temp.path().join(dir).join("task"), dir.as_bytes())?;
        }

        assert_eq!(
            locate_executable(temp.path(), "task")?,
            temp.path().join("alpha/task")
        );
        Ok(())
    }

    #[test]
    fn test_locate_ignores_deeper_levels() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("a/b")).unwrap();
        std::fs::write(temp.path().join("a/b/task"), b"bin").unwrap();

        let err = locate_executable(temp.path(), "task").unwrap_err();
        assert!(matches!(err, Error::ExecutableNotFound { .. }));
        assert!(err.to_string().contains(&temp.path().display().to_string()));
    }

    #[test]
    fn test_locate_directory_named_like_executable() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("task")).unwrap();

        let err = locate_executable(temp.path(), "task").unwrap_err();
        assert!(matches!(err, Error::ExecutableNotFound { .. }));
    }

    #[test]
    fn test_locate_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("missing");
        let err = locate_executable(&root, "task").unwrap_err();
        assert!(matches!(err, Error::ExecutableNotFound { .. }));
        assert!(err.to_string().contains(&root.display().to_string()));
    }
}
