//! Core of setup-task: installs the Task CLI on a CI agent.
//!
//! This crate provides:
//! - Version resolution from an explicit input, a version file, or the
//!   latest published release
//! - A cross-run cache of the installed executable
//! - The [`pipeline::InstallPipeline`] tying resolution, cache and install
//!   together and exporting the result to the CI host
//!
//! Network access, archive handling and the CI host live behind the traits in
//! [`tools`] and [`host`], implemented by the provider crates.
//!
//! # Example
//!
//! ```ignore
//! use setup_task_core::pipeline::InstallPipeline;
//! use setup_task_core::request::InstallRequest;
//!
//! let request = InstallRequest::new("latest", None)?;
//! let pipeline = InstallPipeline::new(resolver, cache, installer, host, probe, reporter);
//! let installed = pipeline.run(&request).await?;
//! println!("{}", installed.path.display());
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod environment;
pub mod error;
pub mod fs;
pub mod host;
pub mod paths;
pub mod pipeline;
pub mod reporter;
pub mod request;
pub mod tools;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Error, IoResultExt, Result};
