//! Error types for setup-task operations

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Error type for every stage of the install pipeline
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Conflicting or invalid inputs
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(setup_task::config),
        help("Check the action inputs; 'version' and 'version-from-file' cannot both be set")
    )]
    Configuration {
        /// Description of the configuration problem
        message: String,
    },

    /// OS or architecture outside the supported mapping
    #[error("Unsupported platform: {os}/{arch}")]
    #[diagnostic(
        code(setup_task::unsupported_platform),
        help("Task release archives exist for windows, darwin and linux on amd64, arm64 and arm")
    )]
    UnsupportedPlatform {
        /// Raw operating system identifier
        os: String,
        /// Raw architecture identifier
        arch: String,
    },

    /// Release index request failed
    #[error("Failed to resolve latest version: {message}. Set an explicit 'version' input instead")]
    #[diagnostic(code(setup_task::network))]
    Network {
        /// Underlying transport or parse failure
        message: String,
    },

    /// Archive download failed
    #[error("Failed to download {url}: {message}")]
    #[diagnostic(
        code(setup_task::download),
        help("Verify that the requested version exists for this platform")
    )]
    Download {
        /// URL being fetched
        url: String,
        /// Underlying transport failure
        message: String,
    },

    /// The release index returned nothing usable
    #[error("No release found: {message}")]
    #[diagnostic(code(setup_task::not_found))]
    NotFound {
        /// What was missing
        message: String,
    },

    /// Archive extension is neither zip nor tar.gz
    #[error("Unsupported archive format: {}", path.display())]
    #[diagnostic(code(setup_task::unsupported_archive))]
    UnsupportedArchive {
        /// Path of the downloaded archive
        path: Box<Path>,
    },

    /// Archive could not be unpacked
    #[error("Failed to extract {}: {message}", archive.display())]
    #[diagnostic(code(setup_task::extraction))]
    Extraction {
        /// Path of the archive being extracted
        archive: Box<Path>,
        /// Underlying failure
        message: String,
    },

    /// Executable not present in the extracted tree
    #[error("Executable '{name}' not found in {}", root.display())]
    #[diagnostic(
        code(setup_task::executable_not_found),
        help("The archive layout may have changed; expected the executable at the top level or one directory deep")
    )]
    ExecutableNotFound {
        /// Executable file name searched for
        name: String,
        /// Extraction root that was searched
        root: Box<Path>,
    },

    /// Installed binary did not answer a version query
    #[error("Verification failed: {message}")]
    #[diagnostic(code(setup_task::verification))]
    Verification {
        /// Why verification failed
        message: String,
    },

    /// I/O error
    #[error("I/O {operation} failed{}: {source}", path.as_ref().map_or(String::new(), |p| format!(" for {}", p.display())))]
    #[diagnostic(
        code(setup_task::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "read", "write", "create")
        operation: String,
    },

    /// Cache backend failure
    #[error("Cache error: {message}")]
    #[diagnostic(code(setup_task::cache))]
    Cache {
        /// Description of the cache problem
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Create an unsupported platform error
    #[must_use]
    pub fn unsupported_platform(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Create a network error
    #[must_use]
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
        }
    }

    /// Create a download error
    #[must_use]
    pub fn download(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: msg.into(),
        }
    }

    /// Create a not found error
    #[must_use]
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound {
            message: msg.into(),
        }
    }

    /// Create an unsupported archive error
    #[must_use]
    pub fn unsupported_archive(path: impl AsRef<Path>) -> Self {
        Self::UnsupportedArchive {
            path: path.as_ref().into(),
        }
    }

    /// Create an extraction error
    #[must_use]
    pub fn extraction(archive: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Self::Extraction {
            archive: archive.as_ref().into(),
            message: msg.into(),
        }
    }

    /// Create an executable not found error
    #[must_use]
    pub fn executable_not_found(name: impl Into<String>, root: impl AsRef<Path>) -> Self {
        Self::ExecutableNotFound {
            name: name.into(),
            root: root.as_ref().into(),
        }
    }

    /// Create a verification error
    #[must_use]
    pub fn verification(msg: impl Into<String>) -> Self {
        Self::Verification {
            message: msg.into(),
        }
    }

    /// Create an I/O error with path context
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }

    /// Create an I/O error without path context
    #[must_use]
    pub fn io_no_path(source: std::io::Error, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: None,
            operation: operation.into(),
        }
    }

    /// Create a cache error
    #[must_use]
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache {
            message: msg.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::io_no_path(source, "operation")
    }
}

/// Result type for setup-task operations
pub type Result<T> = std::result::Result<T, Error>;

/// Attach a path to an I/O result.
pub trait IoResultExt<T> {
    /// Convert an I/O error into [`Error::Io`] carrying `path` and `operation`.
    fn with_path(self, path: &Path, operation: &str) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: &Path, operation: &str) -> Result<T> {
        self.map_err(|e| Error::io(e, path, operation))
    }
}
