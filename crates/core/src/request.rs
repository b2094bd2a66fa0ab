//! Validated install request built from the action inputs.

use std::path::{Path, PathBuf};

use crate::environment::EnvironmentOverlay;
use crate::{Error, Result};

/// Sentinel version meaning "whatever the newest release is".
pub const LATEST: &str = "latest";

/// Immutable description of what to install.
///
/// Construct with [`InstallRequest::new`] and refine with the `with_*`
/// builders before handing it to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    version_spec: String,
    version_file: Option<PathBuf>,
    use_cache: bool,
    auth_token: Option<String>,
    vars: EnvironmentOverlay,
}

impl InstallRequest {
    /// Create a request from the raw `version` and `version-from-file` inputs.
    ///
    /// An empty version is treated as [`LATEST`]; an empty file path as unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when both an explicit version and a
    /// version file are given.
    pub fn new(version_spec: &str, version_file: Option<&Path>) -> Result<Self> {
        let version_spec = match version_spec.trim() {
            "" => LATEST.to_string(),
            spec => spec.to_string(),
        };
        let version_file = version_file
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);

        if version_file.is_some() && version_spec != LATEST {
            return Err(Error::configuration(
                "inputs 'version' and 'version-from-file' conflict; set only one of them",
            ));
        }

        Ok(Self {
            version_spec,
            version_file,
            use_cache: true,
            auth_token: None,
            vars: EnvironmentOverlay::default(),
        })
    }

    /// Enable or disable cache restore/save.
    #[must_use]
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Set the bearer token for release index requests. Empty means none.
    #[must_use]
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Set the environment overlay exported to the tool.
    #[must_use]
    pub fn with_vars(mut self, vars: EnvironmentOverlay) -> Self {
        self.vars = vars;
        self
    }

    /// Requested version, or [`LATEST`].
    #[must_use]
    pub fn version_spec(&self) -> &str {
        &self.version_spec
    }

    /// Whether the request asks for the newest release.
    #[must_use]
    pub fn is_latest(&self) -> bool {
        self.version_spec == LATEST
    }

    /// Path of the file holding the version, if any.
    #[must_use]
    pub fn version_file(&self) -> Option<&Path> {
        self.version_file.as_deref()
    }

    /// Whether the cache store should be consulted.
    #[must_use]
    pub fn use_cache(&self) -> bool {
        self.use_cache
    }

    /// Bearer token for the release index.
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Environment overlay.
    #[must_use]
    pub fn vars(&self) -> &EnvironmentOverlay {
        &self.vars
    }
}
