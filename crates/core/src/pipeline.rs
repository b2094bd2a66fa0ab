//! The install pipeline.
//!
//! ```text
//! AlreadyInstalledCheck ─┬─ found ───────────────────────────────┐
//!                        └─ VersionResolved ─┬─ CacheRestore ────┤
//!                                            └─ ArchiveInstall ──┤
//!                                               └─ CacheSave     │
//!                                  PathExported <────────────────┘
//!                                  └─ Verified
//! ```
//!
//! Any step may fail; the first error ends the run and nothing is rolled back.

use std::ffi::OsString;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::cache::CacheStore;
use crate::environment::EnvironmentOverlay;
use crate::host::{Host, TASK_PATH_OUTPUT, ToolProbe, prepend_search_path};
use crate::reporter::Reporter;
use crate::request::InstallRequest;
use crate::tools::{InstallSource, InstalledExecutable, Installer, TOOL_NAME};
use crate::version::VersionResolver;
use crate::{Error, Result};

/// Drives one install from request to verified executable.
pub struct InstallPipeline {
    resolver: VersionResolver,
    cache: CacheStore,
    installer: Arc<dyn Installer>,
    host: Arc<dyn Host>,
    probe: Arc<dyn ToolProbe>,
    reporter: Arc<dyn Reporter>,
    base_path: Option<OsString>,
}

impl InstallPipeline {
    /// Assemble a pipeline. The search path is taken from `PATH`.
    #[must_use]
    pub fn new(
        resolver: VersionResolver,
        cache: CacheStore,
        installer: Arc<dyn Installer>,
        host: Arc<dyn Host>,
        probe: Arc<dyn ToolProbe>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            resolver,
            cache,
            installer,
            host,
            probe,
            reporter,
            base_path: std::env::var_os("PATH"),
        }
    }

    /// Replace the search path the pipeline starts from.
    #[must_use]
    pub fn with_base_path(mut self, path: Option<OsString>) -> Self {
        self.base_path = path;
        self
    }

    /// Run the pipeline for `request`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by version resolution, installation,
    /// export or verification. Cache failures are never returned.
    #[instrument(skip_all, fields(version = request.version_spec(), cache = request.use_cache()))]
    pub async fn run(&self, request: &InstallRequest) -> Result<InstalledExecutable> {
        let executable = match self.probe.locate(TOOL_NAME, self.base_path.as_deref()) {
            Some(path) => {
                self.reporter
                    .info(&format!("Task already installed at {}", path.display()));
                InstalledExecutable::new(path, InstallSource::System)
            }
            None => self.acquire(request).await?,
        };

        self.export(&executable, request.vars())?;
        self.verify(&executable, request.vars()).await?;

        info!(
            path = %executable.path.display(),
            source = %executable.source,
            "Task ready"
        );
        Ok(executable)
    }

    async fn acquire(&self, request: &InstallRequest) -> Result<InstalledExecutable> {
        let version = self.resolver.resolve(request).await?;

        if request.use_cache()
            && let Some(path) = self.cache.restore(&version).await
        {
            return Ok(InstalledExecutable::new(path, InstallSource::Cache));
        }

        self.reporter.info(&format!(
            "Installing task {version} from {}",
            self.installer.description()
        ));
        let installed = self
            .installer
            .install(&version, request.auth_token())
            .await?;

        if request.use_cache() {
            self.cache.save(&installed.path, &version).await;
        }
        Ok(installed)
    }

    fn export(&self, executable: &InstalledExecutable, vars: &EnvironmentOverlay) -> Result<()> {
        self.host.add_path(executable.dir())?;
        self.host
            .set_output(TASK_PATH_OUTPUT, &executable.path.to_string_lossy())?;
        for (key, value) in vars.iter() {
            self.host.export_variable(key, value)?;
        }
        Ok(())
    }

    async fn verify(
        &self,
        executable: &InstalledExecutable,
        vars: &EnvironmentOverlay,
    ) -> Result<()> {
        let search_path = prepend_search_path(executable.dir(), self.base_path.as_deref())?;
        let resolved = self
            .probe
            .locate(TOOL_NAME, Some(search_path.as_os_str()))
            .ok_or_else(|| {
                Error::verification(format!(
                    "task not found on search path after adding {}",
                    executable.dir().display()
                ))
            })?;

        let output = self
            .probe
            .version_output(&resolved, &vars.with_search_path(&search_path))
            .await?;
        let Some(line) = output.lines().map(str::trim).find(|l| !l.is_empty()) else {
            return Err(Error::verification("No version returned."));
        };

        self.reporter.info(line);
        Ok(())
    }
}
