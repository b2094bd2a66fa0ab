//! Cross-run cache of the installed executable.
//!
//! ## Architecture
//!
//! - [`CacheBackend`] - external store that persists a directory under a key
//!   and materialises it again on a later run.
//! - [`CacheStore`] - the pipeline's view: restores or saves the executable
//!   for a resolved version, downgrading every backend failure to a warning.
//! - [`LocalCacheBackend`] - a [`CacheBackend`] on the local file system,
//!   shared between runs on the same machine (e.g. a self-hosted runner's
//!   tool cache).
//!
//! Cache entries are keyed by [`cache_key`]:
//!
//! ```text
//! setup-task-{version}-{os}-{arch}
//! ```

mod local;
mod store;

pub use local::LocalCacheBackend;
pub use store::CacheStore;

use async_trait::async_trait;
use std::path::Path;

use crate::Result;
use crate::tools::Platform;
use crate::version::ResolvedVersion;

/// Fixed namespace prefix of every cache key.
pub const CACHE_NAMESPACE: &str = "setup-task";

/// Compute the cache key for `version` on `platform`.
#[must_use]
pub fn cache_key(version: &ResolvedVersion, platform: Platform) -> String {
    format!(
        "{CACHE_NAMESPACE}-{version}-{}-{}",
        platform.os, platform.arch
    )
}

/// External store of cached directories.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Materialise the entry for `key` into `dir`.
    ///
    /// Returns the matched key on a hit and `None` on a miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry exists but cannot be transferred.
    async fn restore(&self, dir: &Path, key: &str) -> Result<Option<String>>;

    /// Persist the contents of `dir` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be stored.
    async fn save(&self, dir: &Path, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Arch, Os};

    #[test]
    fn test_cache_key_format() {
        let version = ResolvedVersion::new("3.43.1").unwrap();
        let platform = Platform::new(Os::Linux, Arch::Amd64);
        assert_eq!(cache_key(&version, platform), "setup-task-3.43.1-linux-amd64");
    }

    #[test]
    fn test_cache_key_distinguishes_platforms() {
        let version = ResolvedVersion::new("3.43.1").unwrap();
        let a = cache_key(&version, Platform::new(Os::Darwin, Arch::Arm64));
        let b = cache_key(&version, Platform::new(Os::Darwin, Arch::Amd64));
        assert_ne!(a, b);
        assert_eq!(a, "setup-task-3.43.1-darwin-arm64");
    }

    #[test]
    fn test_cache_key_keeps_explicit_prefix() {
        let version = ResolvedVersion::new("v3.43.1").unwrap();
        let platform = Platform::new(Os::Windows, Arch::Amd64);
        assert_eq!(cache_key(&version, platform), "setup-task-v3.43.1-windows-amd64");
    }
}
