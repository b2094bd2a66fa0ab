//! Pipeline-facing cache of the installed executable.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{CacheBackend, cache_key};
use crate::error::IoResultExt;
use crate::fs::make_executable;
use crate::reporter::Reporter;
use crate::Result;
use crate::tools::Platform;
use crate::version::ResolvedVersion;

/// Restores and saves the executable through a [`CacheBackend`].
///
/// Neither operation fails: backend errors become warnings and a restore
/// degrades to a miss.
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    dir: PathBuf,
    platform: Platform,
    reporter: Arc<dyn Reporter>,
}

impl CacheStore {
    /// Create a store that materialises entries into `dir`.
    #[must_use]
    pub fn new(
        backend: Arc<dyn CacheBackend>,
        dir: PathBuf,
        platform: Platform,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            backend,
            dir,
            platform,
            reporter,
        }
    }

    /// Local directory entries are restored into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the executable occupies inside the cache directory.
    #[must_use]
    pub fn executable_path(&self) -> PathBuf {
        self.dir.join(self.platform.executable_name())
    }

    /// Restore the executable for `version`, if cached.
    #[instrument(skip_all, fields(version = %version))]
    pub async fn restore(&self, version: &ResolvedVersion) -> Option<PathBuf> {
        let key = cache_key(version, self.platform);
        self.reporter.debug(&format!("Restoring cache key {key}"));

        if let Err(e) = clear_dir(&self.dir).await {
            self.reporter
                .warn(&format!("Failed to restore cache {key}: {e}"));
            return None;
        }

        let matched = match self.backend.restore(&self.dir, &key).await {
            Ok(Some(matched)) => matched,
            Ok(None) => {
                self.reporter.info(&format!("Cache miss for {key}"));
                return None;
            }
            Err(e) => {
                self.reporter
                    .warn(&format!("Failed to restore cache {key}: {e}"));
                return None;
            }
        };

        let executable = self.executable_path();
        if !executable.is_file() {
            self.reporter.warn(&format!(
                "Cache hit for {matched} but {} is missing, reinstalling",
                executable.display()
            ));
            return None;
        }

        if let Err(e) = make_executable(&executable) {
            self.reporter.warn(&format!(
                "Cache hit for {matched} but {} could not be made executable: {e}",
                executable.display()
            ));
            return None;
        }

        self.reporter.info(&format!("Restored task from cache {matched}"));
        Some(executable)
    }

    /// Save `executable` for `version`. Failures are logged and swallowed.
    #[instrument(skip_all, fields(version = %version))]
    pub async fn save(&self, executable: &Path, version: &ResolvedVersion) {
        let key = cache_key(version, self.platform);
        match self.try_save(executable, &key).await {
            Ok(()) => self.reporter.info(&format!("Saved task to cache {key}")),
            Err(e) => self
                .reporter
                .warn(&format!("Failed to save cache {key}: {e}")),
        }
    }

    async fn try_save(&self, executable: &Path, key: &str) -> Result<()> {
        if !executable.starts_with(&self.dir) {
            clear_dir(&self.dir).await?;
        }
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_path(&self.dir, "create")?;

        let dest = self.executable_path();
        if executable != dest {
            tokio::fs::copy(executable, &dest)
                .await
                .with_path(executable, "copy")?;
            debug!(from = %executable.display(), to = %dest.display(), "Copied executable into cache dir");
        }

        self.backend.save(&self.dir, key).await
    }
}

/// Remove `dir` and everything in it. A missing directory is not an error.
async fn clear_dir(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            Err::<(), _>(e).with_path(dir, "remove")
        }
        _ => Ok(()),
    }
}
