//! File-system helpers shared by the cache store and the installers.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::Result;
use crate::error::IoResultExt;

/// Permission bits applied to installed executables.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Copy the tree under `src` into `dest`, returning the number of files copied.
///
/// Directories are walked breadth-first from an explicit work list, so deep
/// trees never grow the call stack. `dest` and any missing parents are
/// created. Existing files at the destination are overwritten; symlinks are
/// followed and copied as regular files.
///
/// # Errors
///
/// Returns an error if a directory cannot be read or created, or a file
/// cannot be copied.
pub fn copy_dir(src: &Path, dest: &Path) -> Result<u64> {
    let mut queue: VecDeque<(PathBuf, PathBuf)> = VecDeque::new();
    queue.push_back((src.to_path_buf(), dest.to_path_buf()));
    let mut copied = 0;

    while let Some((from_dir, to_dir)) = queue.pop_front() {
        std::fs::create_dir_all(&to_dir).with_path(&to_dir, "create")?;

        for entry in std::fs::read_dir(&from_dir).with_path(&from_dir, "read")? {
            let entry = entry.with_path(&from_dir, "read")?;
            let from = entry.path();
            let to = to_dir.join(entry.file_name());

            if from.is_dir() {
                queue.push_back((from, to));
            } else {
                std::fs::copy(&from, &to).with_path(&from, "copy")?;
                trace!(from = %from.display(), to = %to.display(), "Copied file");
                copied += 1;
            }
        }
    }

    Ok(copied)
}

/// Apply [`EXECUTABLE_MODE`] to `path`.
///
/// A no-op on non-Unix platforms, where execute permission is not a mode bit.
///
/// # Errors
///
/// Returns an error if the permissions cannot be read or written.
pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path).with_path(path, "stat")?.permissions();
        perms.set_mode(EXECUTABLE_MODE);
        std::fs::set_permissions(path, perms).with_path(path, "chmod")?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
