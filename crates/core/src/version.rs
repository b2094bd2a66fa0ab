//! Version resolution: explicit input, version file, or latest release.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::reporter::Reporter;
use crate::request::InstallRequest;
use crate::tools::ReleaseIndex;
use crate::{Error, Result};

/// Concrete version used for the cache key and the download URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedVersion(String);

impl ResolvedVersion {
    /// Wrap a version string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an empty or blank string.
    pub fn new(version: impl Into<String>) -> Result<Self> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(Error::configuration("resolved version is empty"));
        }
        Ok(Self(version))
    }

    /// Version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns an [`InstallRequest`] into a [`ResolvedVersion`].
pub struct VersionResolver {
    index: Arc<dyn ReleaseIndex>,
    reporter: Arc<dyn Reporter>,
}

impl VersionResolver {
    /// Create a resolver backed by `index` for "latest" lookups.
    #[must_use]
    pub fn new(index: Arc<dyn ReleaseIndex>, reporter: Arc<dyn Reporter>) -> Self {
        Self { index, reporter }
    }

    /// Resolve the version to install.
    ///
    /// Precedence: version file, explicit version (used verbatim), latest
    /// release (one leading `v` stripped). A version file with no content
    /// falls back to the latest release.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the version file cannot be read,
    /// [`Error::Network`] if the release index fails, or [`Error::NotFound`]
    /// if the latest release carries no tag.
    #[instrument(skip_all, fields(spec = request.version_spec()))]
    pub async fn resolve(&self, request: &InstallRequest) -> Result<ResolvedVersion> {
        if let Some(path) = request.version_file() {
            let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                Error::configuration(format!(
                    "failed to read version file {}: {e}",
                    path.display()
                ))
            })?;

            if let Some(line) = content.lines().map(str::trim).find(|l| !l.is_empty()) {
                debug!(path = %path.display(), version = line, "Version read from file");
                return ResolvedVersion::new(line);
            }

            self.reporter.warn(&format!(
                "Version file {} is empty, resolving latest release",
                path.display()
            ));
            return self.latest(request.auth_token()).await;
        }

        if request.is_latest() {
            return self.latest(request.auth_token()).await;
        }

        ResolvedVersion::new(request.version_spec())
    }

    async fn latest(&self, token: Option<&str>) -> Result<ResolvedVersion> {
        self.reporter.debug("Resolving latest release");
        let release = self.index.latest_release(token).await?;

        let tag = release.tag_name.unwrap_or_default();
        let tag = tag.trim();
        let version = Some(tag.strip_prefix('v').unwrap_or(tag))
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::not_found("latest release has no usable tag_name"))?;

        self.reporter
            .info(&format!("Resolved latest release {tag} as version {version}"));
        ResolvedVersion::new(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::LATEST;
    use crate::test_utils::{FakeReleaseIndex, RecordingReporter};
    use std::path::Path;
    use tempfile::TempDir;

    fn resolver(index: FakeReleaseIndex) -> (VersionResolver, Arc<FakeReleaseIndex>) {
        let index = Arc::new(index);
        let resolver = VersionResolver::new(index.clone(), Arc::new(RecordingReporter::default()));
        (resolver, index)
    }

    #[tokio::test]
    async fn test_explicit_versions_are_verbatim() {
        let (resolver, index) = resolver(FakeReleaseIndex::with_tag("v9.9.9"));

        for spec in ["3.43.1", "v3.43.1", "3.0.0-beta.1", "vv1"] {
            let request = InstallRequest::new(spec, None).unwrap();
            let version = resolver.resolve(&request).await.unwrap();
            assert_eq!(version.as_str(), spec);
        }
        assert_eq!(index.calls(), 0);
    }

    #[tokio::test]
    async fn test_latest_strips_single_v() {
        let (resolver, index) = resolver(FakeReleaseIndex::with_tag("v3.43.1"));
        let request = InstallRequest::new(LATEST, None).unwrap();

        let version = resolver.resolve(&request).await.unwrap();
        assert_eq!(version.as_str(), "3.43.1");
        assert_eq!(index.calls(), 1);
    }

    #[tokio::test]
    async fn test_latest_without_v_prefix() {
        let (resolver, _) = resolver(FakeReleaseIndex::with_tag("3.43.1"));
        let request = InstallRequest::new(LATEST, None).unwrap();
        assert_eq!(resolver.resolve(&request).await.unwrap().as_str(), "3.43.1");
    }

    #[tokio::test]
    async fn test_latest_passes_token() {
        let (resolver, index) = resolver(FakeReleaseIndex::with_tag("v1.0.0"));
        let request = InstallRequest::new(LATEST, None)
            .unwrap()
            .with_auth_token(Some("secret".into()));

        resolver.resolve(&request).await.unwrap();
        assert_eq!(index.last_token().as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_latest_missing_tag_is_not_found() {
        let (resolver, _) = resolver(FakeReleaseIndex::without_tag());
        let request = InstallRequest::new(LATEST, None).unwrap();

        let err = resolver.resolve(&request).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_latest_bare_v_tag_is_not_found() {
        let (resolver, _) = resolver(FakeReleaseIndex::with_tag("v"));
        let request = InstallRequest::new(LATEST, None).unwrap();

        let err = resolver.resolve(&request).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_latest_network_failure_propagates() {
        let (resolver, _) = resolver(FakeReleaseIndex::failing("connection reset"));
        let request = InstallRequest::new(LATEST, None).unwrap();

        let err = resolver.resolve(&request).await.unwrap_err();
        assert!(matches!(err, Error::Network { .. }));
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_version_file_trimmed() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(".task-version");
        std::fs::write(&file, "3.42.0\n").unwrap();

        let (resolver, index) = resolver(FakeReleaseIndex::with_tag("v9.9.9"));
        let request = InstallRequest::new(LATEST, Some(&file)).unwrap();

        assert_eq!(resolver.resolve(&request).await.unwrap().as_str(), "3.42.0");
        assert_eq!(index.calls(), 0);
    }

    #[tokio::test]
    async fn test_version_file_first_non_blank_line() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(".task-version");
        std::fs::write(&file, "\n\n  3.40.1  \n3.0.0\n").unwrap();

        let (resolver, _) = resolver(FakeReleaseIndex::with_tag("v9.9.9"));
        let request = InstallRequest::new(LATEST, Some(&file)).unwrap();

        assert_eq!(resolver.resolve(&request).await.unwrap().as_str(), "3.40.1");
    }

    #[tokio::test]
    async fn test_empty_version_file_falls_back_to_latest() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(".task-version");
        std::fs::write(&file, "  \n\n").unwrap();

        let (resolver, index) = resolver(FakeReleaseIndex::with_tag("v3.43.1"));
        let request = InstallRequest::new(LATEST, Some(&file)).unwrap();

        assert_eq!(resolver.resolve(&request).await.unwrap().as_str(), "3.43.1");
        assert_eq!(index.calls(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_version_file() {
        let (resolver, _) = resolver(FakeReleaseIndex::with_tag("v1.0.0"));
        let request =
            InstallRequest::new(LATEST, Some(Path::new("/nonexistent/.task-version"))).unwrap();

        let err = resolver.resolve(&request).await.unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.to_string().contains("/nonexistent/.task-version"));
    }

    #[test]
    fn test_resolved_version_rejects_empty() {
        assert!(ResolvedVersion::new("").is_err());
        assert!(ResolvedVersion::new("  ").is_err());
        assert_eq!(ResolvedVersion::new("1.2.3").unwrap().to_string(), "1.2.3");
    }
}
