//! Tool identification and provider traits.
//!
//! # Architecture
//!
//! - [`Platform`], [`Os`], [`Arch`] - Platform identification in Task's naming
//! - [`ReleaseIndex`] - Source of the latest published release
//! - [`Installer`] - Turns a resolved version into an executable on disk
//! - [`InstalledExecutable`] - Result of the pipeline
//!
//! # Example
//!
//! ```ignore
//! use setup_task_core::tools::{Installer, Platform};
//!
//! let platform = Platform::current()?;
//! let installer = ArchiveInstaller::new(platform, reporter);
//! let installed = installer.install(&version, None).await?;
//! ```

mod platform;
mod provider;

pub use platform::{Arch, Os, Platform, TOOL_NAME};
pub use provider::{InstallSource, InstalledExecutable, Installer, Release, ReleaseIndex};
