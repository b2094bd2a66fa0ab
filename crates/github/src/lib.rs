//! GitHub Actions integration for setup-task.
//!
//! This crate provides GitHub Actions implementations of:
//! - [`ActionsReporter`] emitting workflow commands (`::warning::`, `::error::`, ...)
//! - [`ActionsHost`] writing step outputs, path additions and exported
//!   variables through the `GITHUB_OUTPUT`, `GITHUB_PATH` and `GITHUB_ENV`
//!   file commands
//! - [`inputs`] helpers for the action's `INPUT_*` environment

#![warn(missing_docs)]

pub mod commands;
pub mod host;
pub mod inputs;
pub mod reporter;

pub use host::ActionsHost;
pub use reporter::ActionsReporter;
