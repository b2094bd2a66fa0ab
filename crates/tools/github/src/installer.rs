//! Installer downloading Task release archives.

use async_trait::async_trait;
use setup_task_core::fs::make_executable;
use setup_task_core::reporter::Reporter;
use setup_task_core::tools::{InstallSource, InstalledExecutable, Installer, Platform};
use setup_task_core::version::ResolvedVersion;
use setup_task_core::{Error, IoResultExt, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::download::Downloader;
use crate::extract::extract_archive;
use crate::locate::locate_executable;

/// Base URL of Task release downloads.
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://github.com/go-task/task/releases/download";

/// Installs Task from a platform-specific release archive.
///
/// Layout of one install under the work directory:
/// ```text
/// <work_dir>/<uuid>/
/// ├── task_linux_amd64.tar.gz
/// └── extract/
///     └── task
/// ```
pub struct ArchiveInstaller {
    platform: Platform,
    downloader: Arc<dyn Downloader>,
    work_dir: PathBuf,
    base_url: String,
    reporter: Arc<dyn Reporter>,
}

impl ArchiveInstaller {
    /// Create an installer for `platform` downloading into `work_dir`.
    #[must_use]
    pub fn new(
        platform: Platform,
        downloader: Arc<dyn Downloader>,
        work_dir: PathBuf,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            platform,
            downloader,
            work_dir,
            base_url: DEFAULT_DOWNLOAD_BASE.to_string(),
            reporter,
        }
    }

    /// Download from a different base URL (mirrors, tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Archive URL for `version` on this installer's platform.
    ///
    /// The version is used as given; a `v` is always prepended.
    #[must_use]
    pub fn download_url(&self, version: &ResolvedVersion) -> String {
        format!(
            "{}/v{}/{}",
            self.base_url.trim_end_matches('/'),
            version,
            self.platform.asset_name()
        )
    }

    async fn unpack(&self, archive: PathBuf, dest: PathBuf) -> Result<PathBuf> {
        let name = self.platform.executable_name();
        tokio::task::spawn_blocking(move || {
            extract_archive(&archive, &dest)?;
            let executable = locate_executable(&dest, name)?;
            make_executable(&executable)?;
            Ok(executable)
        })
        .await
        .map_err(|e| Error::extraction(self.platform.asset_name(), e.to_string()))?
    }
}

#[async_trait]
impl Installer for ArchiveInstaller {
    fn description(&self) -> &'static str {
        "GitHub Releases"
    }

    #[instrument(skip_all, fields(version = %version, platform = %self.platform))]
    async fn install(
        &self,
        version: &ResolvedVersion,
        token: Option<&str>,
    ) -> Result<InstalledExecutable> {
        let url = self.download_url(version);
        let run_dir = self.work_dir.join(uuid::Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&run_dir)
            .await
            .with_path(&run_dir, "create")?;

        self.reporter.info(&format!("Downloading {url}"));
        let archive = run_dir.join(self.platform.asset_name());
        self.downloader.download(&url, token, &archive).await?;

        let extract_dir = run_dir.join("extract");
        debug!(archive = %archive.display(), dest = %extract_dir.display(), "Extracting");
        let executable = self.unpack(archive, extract_dir).await?;

        info!(path = %executable.display(), "Installed task");
        Ok(InstalledExecutable::new(executable, InstallSource::Download))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HttpDownloader;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use setup_task_core::test_utils::RecordingReporter;
    use setup_task_core::tools::{Arch, Os};
    use std::path::Path;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn installer(platform: Platform, work_dir: &Path) -> ArchiveInstaller {
        ArchiveInstaller::new(
            platform,
            Arc::new(HttpDownloader::new(crate::http_client().unwrap())),
            work_dir.to_path_buf(),
            Arc::new(RecordingReporter::default()),
        )
    }

    fn tarball(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        for (entry, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_path(entry).unwrap();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append(&header, &content[..]).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_download_url_all_platforms() {
        let version = ResolvedVersion::new("3.43.1").unwrap();
        let base = DEFAULT_DOWNLOAD_BASE;
        let cases = [
            (Os::Linux, Arch::Amd64, "task_linux_amd64.tar.gz"),
            (Os::Linux, Arch::Arm64, "task_linux_arm64.tar.gz"),
            (Os::Linux, Arch::Arm, "task_linux_arm.tar.gz"),
            (Os::Darwin, Arch::Amd64, "task_darwin_amd64.tar.gz"),
            (Os::Darwin, Arch::Arm64, "task_darwin_arm64.tar.gz"),
            (Os::Darwin, Arch::Arm, "task_darwin_arm.tar.gz"),
            (Os::Windows, Arch::Amd64, "task_windows_amd64.zip"),
            (Os::Windows, Arch::Arm64, "task_windows_arm64.zip"),
            (Os::Windows, Arch::Arm, "task_windows_arm.zip"),
        ];

        let temp = TempDir::new().unwrap();
        for (os, arch, asset) in cases {
            let installer = installer(Platform::new(os, arch), temp.path());
            assert_eq!(
                installer.download_url(&version),
                format!("{base}/v3.43.1/{asset}")
            );
        }
    }

    #[test]
    fn test_download_url_keeps_explicit_prefix() {
        let temp = TempDir::new().unwrap();
        let installer = installer(Platform::new(Os::Linux, Arch::Amd64), temp.path())
            .with_base_url("https://mirror.example/task/");
        let version = ResolvedVersion::new("v3.43.1").unwrap();
        assert_eq!(
            installer.download_url(&version),
            "https://mirror.example/task/vv3.43.1/task_linux_amd64.tar.gz"
        );
    }

    #[tokio::test]
    async fn test_install_from_release_archive() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3.43.1/task_linux_amd64.tar.gz"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(tarball(&[("task", b"task-binary"), ("README.md", b"docs")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let installer = installer(Platform::new(Os::Linux, Arch::Amd64), temp.path())
            .with_base_url(server.uri());
        let version = ResolvedVersion::new("3.43.1").unwrap();

        let installed = installer.install(&version, None).await.unwrap();

        assert_eq!(installed.source, InstallSource::Download);
        assert!(installed.path.starts_with(temp.path()));
        assert!(installed.path.ends_with("extract/task"));
        assert_eq!(std::fs::read(&installed.path).unwrap(), b"task-binary");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&installed.path)
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[tokio::test]
    async fn test_install_nested_archive() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(tarball(&[("task_darwin_arm64/task", b"nested")])),
            )
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let installer = installer(Platform::new(Os::Darwin, Arch::Arm64), temp.path())
            .with_base_url(server.uri());
        let version = ResolvedVersion::new("3.40.0").unwrap();

        let installed = installer.install(&version, None).await.unwrap();
        assert!(installed.path.ends_with("extract/task_darwin_arm64/task"));
    }

    #[tokio::test]
    async fn test_install_missing_executable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_bytes(tarball(&[("LICENSE", b"MIT")])),
            )
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let installer = installer(Platform::new(Os::Linux, Arch::Amd64), temp.path())
            .with_base_url(server.uri());
        let version = ResolvedVersion::new("3.43.1").unwrap();

        let err = installer.install(&version, None).await.unwrap_err();
        assert!(matches!(err, Error::ExecutableNotFound { .. }));
    }

    #[tokio::test]
    async fn test_install_download_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let installer = installer(Platform::new(Os::Linux, Arch::Amd64), temp.path())
            .with_base_url(server.uri());
        let version = ResolvedVersion::new("0.0.1").unwrap();

        let err = installer.install(&version, None).await.unwrap_err();
        assert!(matches!(err, Error::Download { .. }));
        assert!(err.to_string().contains("/v0.0.1/task_linux_amd64.tar.gz"));
    }
}
