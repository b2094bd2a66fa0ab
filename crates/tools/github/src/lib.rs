//! GitHub Releases provider for setup-task.
//!
//! Fetches Task from the `go-task/task` GitHub Releases. Provides:
//! - [`GitHubReleaseIndex`] - latest-release lookup through the REST API
//! - [`HttpDownloader`] - archive download with optional bearer token
//! - [`extract_archive`] - zip and tar.gz extraction
//! - [`locate_executable`] - finds the executable in the extracted tree
//! - [`ArchiveInstaller`] - ties the above together as an [`Installer`]
//!
//! [`Installer`]: setup_task_core::tools::Installer

#![warn(missing_docs)]

mod download;
mod extract;
mod index;
mod installer;
mod locate;

pub use download::{Downloader, HttpDownloader};
pub use extract::extract_archive;
pub use index::{DEFAULT_API_BASE, GitHubReleaseIndex};
pub use installer::{ArchiveInstaller, DEFAULT_DOWNLOAD_BASE};
pub use locate::locate_executable;

/// Repository publishing Task releases.
pub const TASK_REPOSITORY: &str = "go-task/task";

/// User agent sent with every request.
pub const USER_AGENT: &str = "setup-task";

/// Build the shared HTTP client.
///
/// # Errors
///
/// Returns [`setup_task_core::Error::Configuration`] if the TLS backend
/// cannot be initialised.
pub fn http_client() -> setup_task_core::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| {
            setup_task_core::Error::configuration(format!("Failed to create HTTP client: {e}"))
        })
}
