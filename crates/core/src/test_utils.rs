//! In-memory collaborators for copilot-action-core tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::commands::{CommandInvocation, CommandRunner, ProcessOutput};
use crate::tools::{ArtifactDownloader, ReleaseSource, ToolDescriptor, ToolStore};
use crate::{Error, Result};

/// Release source answering with a fixed tag or a fixed failure.
pub struct FakeReleases {
    answer: std::result::Result<String, String>,
    queries: Mutex<Vec<(String, String)>>,
}

impl FakeReleases {
    pub fn with_tag(tag: &str) -> Self {
        Self {
            answer: Ok(tag.to_string()),
            queries: Mutex::default(),
        }
    }

    pub fn unavailable(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            queries: Mutex::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn last_query(&self) -> Option<(String, String)> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ReleaseSource for FakeReleases {
    async fn latest_release_tag(&self, owner: &str, repo: &str) -> Result<String> {
        self.queries
            .lock()
            .unwrap()
            .push((owner.to_string(), repo.to_string()));
        self.answer.clone().map_err(Error::upstream_unavailable)
    }
}

/// Downloader writing fixed bytes, or failing every request.
pub struct FakeDownloader {
    body: std::result::Result<Vec<u8>, String>,
    urls: Mutex<Vec<String>>,
}

impl FakeDownloader {
    pub fn new(body: &[u8]) -> Self {
        Self {
            body: Ok(body.to_vec()),
            urls: Mutex::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            body: Err(message.to_string()),
            urls: Mutex::default(),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactDownloader for FakeDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.urls.lock().unwrap().push(url.to_string());
        match &self.body {
            Ok(body) => Ok(std::fs::write(dest, body)?),
            Err(message) => Err(Error::download_failure(url, message.clone())),
        }
    }
}

/// Tool store keeping entries and the search path in memory.
#[derive(Default)]
pub struct MemoryToolStore {
    entries: Mutex<HashMap<ToolDescriptor, PathBuf>>,
    search_path: Mutex<Vec<PathBuf>>,
    registrations: Mutex<Vec<u32>>,
}

impl MemoryToolStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a previous run installed `descriptor`.
    pub fn preload(&self, descriptor: &ToolDescriptor) -> PathBuf {
        let path = Self::entry_path(descriptor);
        self.entries
            .lock()
            .unwrap()
            .insert(descriptor.clone(), path.clone());
        path
    }

    pub fn register_count(&self) -> usize {
        self.registrations.lock().unwrap().len()
    }

    /// Permission bits of each registered source file (0 off unix).
    pub fn registered_modes(&self) -> Vec<u32> {
        self.registrations.lock().unwrap().clone()
    }

    fn entry_path(descriptor: &ToolDescriptor) -> PathBuf {
        PathBuf::from("/tool-cache")
            .join(&descriptor.name)
            .join(&descriptor.version)
    }
}

impl ToolStore for MemoryToolStore {
    fn find(&self, descriptor: &ToolDescriptor) -> Option<PathBuf> {
        self.entries.lock().unwrap().get(descriptor).cloned()
    }

    fn register(
        &self,
        descriptor: &ToolDescriptor,
        source: &Path,
        _executable_name: &str,
    ) -> Result<PathBuf> {
        let metadata = std::fs::metadata(source)?;
        #[cfg(unix)]
        let mode = {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode()
        };
        #[cfg(not(unix))]
        let mode = {
            let _ = metadata;
            0
        };
        self.registrations.lock().unwrap().push(mode);
        Ok(self.preload(descriptor))
    }

    fn append_to_search_path(&self, dir: &Path) -> Result<()> {
        self.search_path.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }

    fn search_path(&self) -> Vec<PathBuf> {
        self.search_path.lock().unwrap().clone()
    }
}

/// Runner recording invocations and succeeding, or failing every run.
#[derive(Default)]
pub struct RecordingRunner {
    fail: bool,
    invocations: Mutex<Vec<CommandInvocation>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &CommandInvocation) -> Result<ProcessOutput> {
        self.invocations.lock().unwrap().push(invocation.clone());
        if self.fail {
            return Err(Error::child_process_failure(
                invocation.display(),
                Some(1),
                "application not found",
            ));
        }
        Ok(ProcessOutput {
            code: Some(0),
            stdout: "{}".to_string(),
            stderr: String::new(),
        })
    }
}
