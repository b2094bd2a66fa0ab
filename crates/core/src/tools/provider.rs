//! Traits for the remote collaborators of the install pipeline.
//!
//! The pipeline never talks to the network directly. A [`ReleaseIndex`]
//! answers "what is the newest release" and an [`Installer`] turns a
//! concrete version into an executable on disk. Provider crates implement
//! both against a real source (GitHub Releases).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Result;
use crate::version::ResolvedVersion;

/// Release metadata as returned by a release index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Tag of the release, e.g. `v3.43.1`.
    #[serde(default)]
    pub tag_name: Option<String>,
}

/// Where an installed executable came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallSource {
    /// Already resolvable on the search path before the run.
    System,
    /// Restored from the cache store.
    Cache,
    /// Downloaded and extracted during this run.
    Download,
}

impl std::fmt::Display for InstallSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Cache => write!(f, "cache"),
            Self::Download => write!(f, "download"),
        }
    }
}

/// Terminal artifact of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledExecutable {
    /// Absolute path to the executable.
    pub path: PathBuf,
    /// How the executable was obtained.
    pub source: InstallSource,
}

impl InstalledExecutable {
    /// Create a new installed executable record.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, source: InstallSource) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    /// Whether the executable was restored from the cache.
    #[must_use]
    pub fn from_cache(&self) -> bool {
        self.source == InstallSource::Cache
    }

    /// Directory containing the executable.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Remote index of published releases.
#[async_trait]
pub trait ReleaseIndex: Send + Sync {
    /// Fetch the most recent release.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Network`] on transport, status, or parse
    /// failures.
    async fn latest_release(&self, token: Option<&str>) -> Result<Release>;
}

/// Installs a concrete version of the tool.
#[async_trait]
pub trait Installer: Send + Sync {
    /// Human-readable source description for log output.
    fn description(&self) -> &'static str;

    /// Download, unpack and locate the executable for `version`.
    ///
    /// # Errors
    ///
    /// Returns an error if any of download, extraction or location fails.
    async fn install(
        &self,
        version: &ResolvedVersion,
        token: Option<&str>,
    ) -> Result<InstalledExecutable>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_deserialization() {
        let release: Release = serde_json::from_str(r#"{"tag_name":"v3.43.1","id":1}"#).unwrap();
        assert_eq!(release.tag_name.as_deref(), Some("v3.43.1"));
    }

    #[test]
    fn test_release_missing_tag() {
        let release: Release = serde_json::from_str(r#"{"name":"nightly"}"#).unwrap();
        assert!(release.tag_name.is_none());
    }

    #[test]
    fn test_installed_executable_from_cache() {
        let exe = InstalledExecutable::new("/cache/task", InstallSource::Cache);
        assert!(exe.from_cache());
        assert_eq!(exe.dir(), Path::new("/cache"));

        let exe = InstalledExecutable::new("/tmp/x/task", InstallSource::Download);
        assert!(!exe.from_cache());
    }

    #[test]
    fn test_install_source_display() {
        assert_eq!(InstallSource::System.to_string(), "system");
        assert_eq!(InstallSource::Cache.to_string(), "cache");
        assert_eq!(InstallSource::Download.to_string(), "download");
    }
}
