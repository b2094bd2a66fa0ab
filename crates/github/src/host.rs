//! GitHub Actions file commands.

use setup_task_core::host::Host;
use setup_task_core::reporter::Reporter;
use setup_task_core::{Error, IoResultExt, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::commands::format_file_entry;

/// [`Host`] backed by the `GITHUB_OUTPUT`, `GITHUB_PATH` and `GITHUB_ENV`
/// files. When a file is not configured (running outside Actions), the
/// corresponding export is reported instead.
pub struct ActionsHost {
    output_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
    env_file: Option<PathBuf>,
    reporter: Arc<dyn Reporter>,
}

impl ActionsHost {
    /// Create a host writing to the given files.
    #[must_use]
    pub fn new(
        output_file: Option<PathBuf>,
        path_file: Option<PathBuf>,
        env_file: Option<PathBuf>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            output_file,
            path_file,
            env_file,
            reporter,
        }
    }

    /// Host configured from the runner's `GITHUB_*` file variables.
    #[must_use]
    pub fn from_env(reporter: Arc<dyn Reporter>) -> Self {
        let file = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self::new(
            file("GITHUB_OUTPUT"),
            file("GITHUB_PATH"),
            file("GITHUB_ENV"),
            reporter,
        )
    }

    fn write_entry(file: &Path, name: &str, value: &str) -> Result<()> {
        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        let entry = format_file_entry(name, value, &delimiter).ok_or_else(|| {
            Error::configuration(format!(
                "value for '{name}' contains the file command delimiter"
            ))
        })?;
        append(file, &entry)
    }
}

fn append(file: &Path, content: &str) -> Result<()> {
    let mut handle = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .with_path(file, "open")?;
    handle
        .write_all(content.as_bytes())
        .with_path(file, "write")?;
    debug!(file = %file.display(), "Appended file command");
    Ok(())
}

impl Host for ActionsHost {
    fn add_path(&self, dir: &Path) -> Result<()> {
        match &self.path_file {
            Some(file) => append(file, &format!("{}\n", dir.display())),
            None => {
                self.reporter
                    .info(&format!("Add {} to PATH", dir.display()));
                Ok(())
            }
        }
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(file) => Self::write_entry(file, name, value),
            None => {
                self.reporter.info(&format!("Output {name}={value}"));
                Ok(())
            }
        }
    }

    fn export_variable(&self, name: &str, value: &str) -> Result<()> {
        match &self.env_file {
            Some(file) => Self::write_entry(file, name, value),
            None => {
                self.reporter.info(&format!("Export {name}={value}"));
                Ok(())
            }
        }
    }
}
