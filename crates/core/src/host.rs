//! Host-side seams of the pipeline: exporting results and probing the tool.

use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::IoResultExt;
use crate::{Error, Result};

/// Output name carrying the absolute path of the executable.
pub const TASK_PATH_OUTPUT: &str = "task-path";

/// Facilities the CI host offers to later steps of the job.
pub trait Host: Send + Sync {
    /// Prepend `dir` to the search path of subsequent steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot record the path.
    fn add_path(&self, dir: &Path) -> Result<()>;

    /// Publish a named output of this step.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot record the output.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;

    /// Export an environment variable to subsequent steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot record the variable.
    fn export_variable(&self, name: &str, value: &str) -> Result<()>;
}

/// Finds and queries the tool on a search path.
#[async_trait]
pub trait ToolProbe: Send + Sync {
    /// Resolve `name` against `search_path` (the process `PATH` when `None`).
    fn locate(&self, name: &str, search_path: Option<&OsStr>) -> Option<PathBuf>;

    /// Run `executable --version` with `envs` added and return trimmed stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits unsuccessfully.
    async fn version_output(
        &self,
        executable: &Path,
        envs: &[(OsString, OsString)],
    ) -> Result<String>;
}

/// [`ToolProbe`] backed by `which` and real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

#[async_trait]
impl ToolProbe for SystemProbe {
    fn locate(&self, name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
        let found = match search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(name, Some(paths), cwd)
            }
            None => which::which(name),
        };
        match found {
            Ok(path) => {
                debug!(name, path = %path.display(), "Located executable");
                Some(path)
            }
            Err(e) => {
                debug!(name, error = %e, "Executable not on search path");
                None
            }
        }
    }

    async fn version_output(
        &self,
        executable: &Path,
        envs: &[(OsString, OsString)],
    ) -> Result<String> {
        let output = tokio::process::Command::new(executable)
            .arg("--version")
            .envs(envs.iter().map(|(k, v)| (k, v)))
            .output()
            .await
            .with_path(executable, "execute")?;

        if !output.status.success() {
            return Err(Error::verification(format!(
                "{} --version exited with {}: {}",
                executable.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// `dir` prepended to `current`, as a `PATH` value.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if a component contains the path
/// separator.
pub fn prepend_search_path(dir: &Path, current: Option<&OsStr>) -> Result<OsString> {
    let rest = current.map(std::env::split_paths).into_iter().flatten();
    std::env::join_paths(std::iter::once(dir.to_path_buf()).chain(rest))
        .map_err(|e| Error::configuration(format!("invalid search path entry: {e}")))
}
