//! File-system cache backend shared between runs on one machine.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::CacheBackend;
use crate::error::IoResultExt;
use crate::fs::copy_dir;
use crate::{Error, Result};

/// Cache backend storing each key as a directory under a root.
///
/// Structure:
/// ```text
/// <root>/
/// ├── setup-task-3.43.1-linux-amd64/
/// │   └── task
/// └── .staging-<uuid>/      # in-flight save, renamed into place
/// ```
#[derive(Debug, Clone)]
pub struct LocalCacheBackend {
    root: PathBuf,
}

impl LocalCacheBackend {
    /// Create a backend rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Backend rooted at [`crate::paths::cache_store_dir`].
    ///
    /// # Errors
    ///
    /// Returns an error if no cache location can be determined.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(crate::paths::cache_store_dir()?))
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the entry for `key`.
    #[must_use]
    pub fn entry_dir(&self, key: &str) -> PathBuf {
        self.root.join(sanitize_key(key))
    }

    fn restore_blocking(&self, dir: &Path, key: &str) -> Result<Option<String>> {
        let entry = self.entry_dir(key);
        if !entry.is_dir() {
            trace!(key, entry = %entry.display(), "Cache entry not present");
            return Ok(None);
        }

        let copied = copy_dir(&entry, dir)?;
        debug!(key, files = copied, dir = %dir.display(), "Restored cache entry");
        Ok(Some(key.to_string()))
    }

    fn save_blocking(&self, dir: &Path, key: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root).with_path(&self.root, "create")?;

        let staging = self
            .root
            .join(format!(".staging-{}", uuid::Uuid::new_v4()));
        if let Err(e) = copy_dir(dir, &staging) {
            let _ = std::fs::remove_dir_all(&staging);
            return Err(e);
        }

        let entry = self.entry_dir(key);
        if entry.exists() {
            std::fs::remove_dir_all(&entry).with_path(&entry, "remove")?;
        }
        if let Err(e) = std::fs::rename(&staging, &entry) {
            let _ = std::fs::remove_dir_all(&staging);
            return Err(Error::io(e, &entry, "rename"));
        }

        debug!(key, entry = %entry.display(), "Saved cache entry");
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for LocalCacheBackend {
    async fn restore(&self, dir: &Path, key: &str) -> Result<Option<String>> {
        let this = self.clone();
        let (dir, key) = (dir.to_path_buf(), key.to_string());
        tokio::task::spawn_blocking(move || this.restore_blocking(&dir, &key))
            .await
            .map_err(|e| Error::cache(format!("restore task failed: {e}")))?
    }

    async fn save(&self, dir: &Path, key: &str) -> Result<()> {
        let this = self.clone();
        let (dir, key) = (dir.to_path_buf(), key.to_string());
        tokio::task::spawn_blocking(move || this.save_blocking(&dir, &key))
            .await
            .map_err(|e| Error::cache(format!("save task failed: {e}")))?
    }
}

/// Map a key onto a single safe path component.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}
