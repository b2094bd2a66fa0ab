//! Platform identification in Task's release naming convention.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Name of the tool executable without any platform suffix.
pub const TOOL_NAME: &str = "task";

/// Platform identifier combining OS and architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detect the platform this process runs on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] when the OS or architecture has
    /// no published Task archive.
    pub fn current() -> Result<Self> {
        Self::from_raw(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map raw runtime identifiers (e.g. "win32"/"x64", "macos"/"aarch64").
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] when either identifier is unknown.
    pub fn from_raw(os: &str, arch: &str) -> Result<Self> {
        match (Os::parse(os), Arch::parse(arch)) {
            (Some(os), Some(arch)) => Ok(Self { os, arch }),
            _ => Err(Error::unsupported_platform(os, arch)),
        }
    }

    /// File name of the tool executable on this platform.
    #[must_use]
    pub fn executable_name(&self) -> &'static str {
        match self.os {
            Os::Windows => "task.exe",
            Os::Darwin | Os::Linux => TOOL_NAME,
        }
    }

    /// Extension of the release archive published for this platform.
    #[must_use]
    pub fn archive_extension(&self) -> &'static str {
        match self.os {
            Os::Windows => "zip",
            Os::Darwin | Os::Linux => "tar.gz",
        }
    }

    /// Release asset name, e.g. `task_linux_amd64.tar.gz`.
    #[must_use]
    pub fn asset_name(&self) -> String {
        format!(
            "{TOOL_NAME}_{}_{}.{}",
            self.os,
            self.arch,
            self.archive_extension()
        )
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Microsoft Windows (`win32`).
    Windows,
    /// macOS.
    Darwin,
    /// Linux.
    Linux,
}

impl Os {
    /// Parse from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "win32" | "windows" => Some(Self::Windows),
            "darwin" | "macos" => Some(Self::Darwin),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::Darwin => write!(f, "darwin"),
            Self::Linux => write!(f, "linux"),
        }
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// 64-bit x86 (`x64`, `x86_64`).
    Amd64,
    /// 64-bit ARM (`aarch64`).
    Arm64,
    /// 32-bit ARM.
    Arm,
}

impl Arch {
    /// Parse from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Some(Self::Amd64),
            "arm64" | "aarch64" => Some(Self::Arm64),
            "arm" => Some(Self::Arm),
            _ => None,
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Amd64 => write!(f, "amd64"),
            Self::Arm64 => write!(f, "arm64"),
            Self::Arm => write!(f, "arm"),
        }
    }
}
