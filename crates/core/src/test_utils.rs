//! Shared test doubles for setup-task tests.
//!
//! Every collaborator of the install pipeline has an in-memory stand-in here
//! so tests can drive the pipeline without network access or a real CI host.
//! Enabled in this crate's tests and, via the `test-utils` feature, in
//! dependent crates' tests.

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::cache::CacheBackend;
use crate::host::{Host, ToolProbe};
use crate::reporter::Reporter;
use crate::tools::{InstallSource, InstalledExecutable, Installer, Release, ReleaseIndex};
use crate::version::ResolvedVersion;
use crate::{Error, Result};

/// Reporter that records every message with its level.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    entries: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingReporter {
    fn push(&self, level: &'static str, message: &str) {
        self.entries.lock().unwrap().push((level, message.to_string()));
    }

    /// Messages recorded at `level`.
    pub fn messages(&self, level: &str) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages("warn")
    }

    pub fn failures(&self) -> Vec<String> {
        self.messages("fail")
    }
}

impl Reporter for RecordingReporter {
    fn debug(&self, message: &str) {
        self.push("debug", message);
    }

    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }

    fn fail(&self, message: &str) {
        self.push("fail", message);
    }
}

enum IndexResponse {
    Release(Release),
    Failure(String),
}

/// Release index answering from a canned response.
pub struct FakeReleaseIndex {
    response: IndexResponse,
    calls: AtomicUsize,
    last_token: Mutex<Option<String>>,
}

impl FakeReleaseIndex {
    fn new(response: IndexResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        }
    }

    pub fn with_tag(tag: &str) -> Self {
        Self::new(IndexResponse::Release(Release {
            tag_name: Some(tag.to_string()),
        }))
    }

    pub fn without_tag() -> Self {
        Self::new(IndexResponse::Release(Release::default()))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(IndexResponse::Failure(message.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReleaseIndex for FakeReleaseIndex {
    async fn latest_release(&self, token: Option<&str>) -> Result<Release> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = token.map(str::to_string);
        match &self.response {
            IndexResponse::Release(release) => Ok(release.clone()),
            IndexResponse::Failure(message) => Err(Error::network(message.clone())),
        }
    }
}

/// Installer that writes a stub executable into a directory.
pub struct FakeInstaller {
    dir: PathBuf,
    executable_name: &'static str,
    fail_with: Option<String>,
    versions: Mutex<Vec<String>>,
}

impl FakeInstaller {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            executable_name: "task",
            fail_with: None,
            versions: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    /// Versions passed to [`Installer::install`], in call order.
    pub fn installed_versions(&self) -> Vec<String> {
        self.versions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Installer for FakeInstaller {
    fn description(&self) -> &'static str {
        "fake installer"
    }

    async fn install(
        &self,
        version: &ResolvedVersion,
        _token: Option<&str>,
    ) -> Result<InstalledExecutable> {
        self.versions.lock().unwrap().push(version.to_string());
        if let Some(message) = &self.fail_with {
            return Err(Error::download("https://example.invalid/task", message.clone()));
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(self.executable_name);
        std::fs::write(&path, format!("task {version}"))?;
        Ok(InstalledExecutable::new(path, InstallSource::Download))
    }
}

/// Cache backend keeping entries as in-memory file lists.
#[derive(Default)]
pub struct MemoryCacheBackend {
    entries: Mutex<BTreeMap<String, Vec<(String, Vec<u8>)>>>,
    failing: bool,
    restores: AtomicUsize,
    saves: AtomicUsize,
}

impl MemoryCacheBackend {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn insert_file(&self, key: &str, name: &str, contents: &[u8]) {
        self.entries
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push((name.to_string(), contents.to_vec()));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn restores(&self) -> usize {
        self.restores.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    async fn restore(&self, dir: &Path, key: &str) -> Result<Option<String>> {
        self.restores.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(Error::cache("backend unavailable"));
        }
        let Some(files) = self.entries.lock().unwrap().get(key).cloned() else {
            return Ok(None);
        };
        std::fs::create_dir_all(dir)?;
        for (name, contents) in files {
            std::fs::write(dir.join(name), contents)?;
        }
        Ok(Some(key.to_string()))
    }

    async fn save(&self, dir: &Path, key: &str) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(Error::cache("backend unavailable"));
        }
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.path().is_file() {
                files.push((
                    entry.file_name().to_string_lossy().into_owned(),
                    std::fs::read(entry.path())?,
                ));
            }
        }
        self.entries.lock().unwrap().insert(key.to_string(), files);
        Ok(())
    }
}

/// Host recording every export.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub paths: Mutex<Vec<PathBuf>>,
    pub outputs: Mutex<Vec<(String, String)>>,
    pub variables: Mutex<Vec<(String, String)>>,
}

impl RecordingHost {
    pub fn output(&self, name: &str) -> Option<String> {
        self.outputs
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }
}

impl Host for RecordingHost {
    fn add_path(&self, dir: &Path) -> Result<()> {
        self.paths.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        self.outputs
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn export_variable(&self, name: &str, value: &str) -> Result<()> {
        self.variables
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
        Ok(())
    }
}

/// Probe with a scripted system install and version output.
#[derive(Debug, Default)]
pub struct FakeProbe {
    system: Option<PathBuf>,
    version: String,
    pub searched: Mutex<Vec<Option<OsString>>>,
    pub runs: Mutex<Vec<(PathBuf, Vec<(OsString, OsString)>)>>,
}

impl FakeProbe {
    /// Probe that finds nothing before install and reports `version` after.
    pub fn reporting(version: &str) -> Self {
        Self {
            version: version.to_string(),
            ..Self::default()
        }
    }

    /// Probe that already finds the tool at `path`.
    #[must_use]
    pub fn with_system(mut self, path: impl Into<PathBuf>) -> Self {
        self.system = Some(path.into());
        self
    }
}

#[async_trait]
impl ToolProbe for FakeProbe {
    fn locate(&self, _name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
        self.searched
            .lock()
            .unwrap()
            .push(search_path.map(OsStr::to_os_string));
        if let Some(system) = &self.system {
            return Some(system.clone());
        }
        // After export the search path leads with the install directory.
        let first = std::env::split_paths(search_path?).next()?;
        let candidate = first.join("task");
        candidate.exists().then_some(candidate)
    }

    async fn version_output(
        &self,
        executable: &Path,
        envs: &[(OsString, OsString)],
    ) -> Result<String> {
        self.runs
            .lock()
            .unwrap()
            .push((executable.to_path_buf(), envs.to_vec()));
        Ok(self.version.clone())
    }
}
