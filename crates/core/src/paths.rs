//! Centralized path management for setup-task directories.
//!
//! | Directory | On a GitHub runner | Elsewhere |
//! |-----------|--------------------|-----------|
//! | Cache dir | `$RUNNER_TOOL_CACHE/task` | `<user cache>/setup-task/bin` |
//! | Cache store | `$RUNNER_TOOL_CACHE/setup-task` | `<user cache>/setup-task/store` |
//! | Work dir | `$RUNNER_TEMP/setup-task` | `<system temp>/setup-task` |
//!
//! All functions support environment variable overrides for testing and CI:
//! - `SETUP_TASK_CACHE_DIR` - Override the cache directory
//! - `SETUP_TASK_CACHE_STORE` - Override the cache store root
//! - `SETUP_TASK_WORK_DIR` - Override the work directory

use crate::{Error, Result};
use std::path::PathBuf;

fn env_dir(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn user_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|d| d.join("setup-task"))
        .ok_or_else(|| Error::configuration("Could not determine cache directory"))
}

/// Directory cache entries are restored into and the executable is saved from.
///
/// Resolution order:
/// 1. `SETUP_TASK_CACHE_DIR` environment variable
/// 2. `$RUNNER_TOOL_CACHE/task`
/// 3. Platform cache directory + `/setup-task/bin`
///
/// # Errors
///
/// Returns an error if no cache directory can be determined.
pub fn cache_dir() -> Result<PathBuf> {
    if let Some(dir) = env_dir("SETUP_TASK_CACHE_DIR") {
        return Ok(dir);
    }
    if let Some(tool_cache) = env_dir("RUNNER_TOOL_CACHE") {
        return Ok(tool_cache.join("task"));
    }
    Ok(user_cache_dir()?.join("bin"))
}

/// Root of the [`crate::cache::LocalCacheBackend`] store.
///
/// Resolution order:
/// 1. `SETUP_TASK_CACHE_STORE` environment variable
/// 2. `$RUNNER_TOOL_CACHE/setup-task`
/// 3. Platform cache directory + `/setup-task/store`
///
/// # Errors
///
/// Returns an error if no cache directory can be determined.
pub fn cache_store_dir() -> Result<PathBuf> {
    if let Some(dir) = env_dir("SETUP_TASK_CACHE_STORE") {
        return Ok(dir);
    }
    if let Some(tool_cache) = env_dir("RUNNER_TOOL_CACHE") {
        return Ok(tool_cache.join("setup-task"));
    }
    Ok(user_cache_dir()?.join("store"))
}

/// Scratch directory for downloads and extraction. Never cleaned up.
///
/// Resolution order:
/// 1. `SETUP_TASK_WORK_DIR` environment variable
/// 2. `$RUNNER_TEMP/setup-task`
/// 3. System temp directory + `/setup-task`
#[must_use]
pub fn work_dir() -> PathBuf {
    if let Some(dir) = env_dir("SETUP_TASK_WORK_DIR") {
        return dir;
    }
    env_dir("RUNNER_TEMP")
        .unwrap_or_else(std::env::temp_dir)
        .join("setup-task")
}
