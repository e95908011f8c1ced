//! Runner tool cache.
//!
//! Tools are stored the way hosted runners lay out `RUNNER_TOOL_CACHE`, so a
//! binary installed by one job is found by the next job on the same host:
//!
//! ```text
//! <root>/
//! └── aws-copilot-cli/
//!     └── v1.34.0/
//!         ├── x64/
//!         │   └── copilot
//!         └── x64.complete
//! ```
//!
//! An entry only counts once its `.complete` marker exists.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use copilot_action_core::tools::{Arch, ToolDescriptor, ToolStore};
use copilot_action_core::{Error, Result};
use tracing::{debug, trace};

/// Default location when `RUNNER_TOOL_CACHE` is unset: `~/.cache/copilot-action/tools`.
#[must_use]
pub fn default_tool_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("copilot-action")
        .join("tools")
}

/// [`ToolStore`] backed by the runner tool cache and `GITHUB_PATH`.
#[derive(Debug)]
pub struct RunnerToolCache {
    root: PathBuf,
    arch: Arch,
    path_file: Option<PathBuf>,
    search_path: Mutex<Vec<PathBuf>>,
}

impl RunnerToolCache {
    /// Create a cache rooted at `root` for binaries of `arch`.
    #[must_use]
    pub fn new(root: PathBuf, arch: Arch) -> Self {
        Self {
            root,
            arch,
            path_file: None,
            search_path: Mutex::default(),
        }
    }

    /// Also persist search path additions to this file (`GITHUB_PATH`).
    #[must_use]
    pub fn with_path_file(mut self, path_file: Option<PathBuf>) -> Self {
        self.path_file = path_file;
        self
    }

    /// Directory holding the executable for `descriptor`.
    #[must_use]
    pub fn tool_dir(&self, descriptor: &ToolDescriptor) -> PathBuf {
        self.version_dir(descriptor).join(self.arch.cache_label())
    }

    fn version_dir(&self, descriptor: &ToolDescriptor) -> PathBuf {
        self.root.join(&descriptor.name).join(&descriptor.version)
    }

    fn marker_path(&self, descriptor: &ToolDescriptor) -> PathBuf {
        self.version_dir(descriptor)
            .join(format!("{}.complete", self.arch.cache_label()))
    }

    fn lock_search_path(&self) -> std::sync::MutexGuard<'_, Vec<PathBuf>> {
        self.search_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Names and versions become directory names, so they must be single normal components.
fn is_safe_component(value: &str) -> bool {
    let mut components = Path::new(value).components();
    matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
}

fn is_safe_descriptor(descriptor: &ToolDescriptor) -> bool {
    is_safe_component(&descriptor.name) && is_safe_component(&descriptor.version)
}

impl ToolStore for RunnerToolCache {
    fn find(&self, descriptor: &ToolDescriptor) -> Option<PathBuf> {
        if !is_safe_descriptor(descriptor) {
            trace!(tool = %descriptor, "Descriptor cannot be cached");
            return None;
        }

        let dir = self.tool_dir(descriptor);
        if dir.is_dir() && self.marker_path(descriptor).is_file() {
            trace!(tool = %descriptor, ?dir, "Cache hit for tool");
            Some(dir)
        } else {
            trace!(tool = %descriptor, "Cache miss for tool");
            None
        }
    }

    fn register(
        &self,
        descriptor: &ToolDescriptor,
        source: &Path,
        executable_name: &str,
    ) -> Result<PathBuf> {
        if !is_safe_descriptor(descriptor) || !is_safe_component(executable_name) {
            return Err(Error::cache(format!(
                "'{descriptor}' cannot be used as a cache key"
            )));
        }

        let dir = self.tool_dir(descriptor);
        let marker = self.marker_path(descriptor);

        // Leftovers from an interrupted registration
        if marker.exists() {
            std::fs::remove_file(&marker)?;
        }
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::create_dir_all(&dir)?;

        let dest = dir.join(executable_name);
        std::fs::copy(source, &dest)?;
        std::fs::write(&marker, b"")?;

        debug!(tool = %descriptor, ?dest, "Stored tool in cache");
        Ok(dir)
    }

    fn append_to_search_path(&self, dir: &Path) -> Result<()> {
        if let Some(path_file) = &self.path_file {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path_file)?;
            writeln!(file, "{}", dir.display())?;
            debug!(?dir, ?path_file, "Added directory to GITHUB_PATH");
        }

        let mut search_path = self.lock_search_path();
        if !search_path.iter().any(|existing| existing == dir) {
            search_path.push(dir.to_path_buf());
        }
        Ok(())
    }

    fn search_path(&self) -> Vec<PathBuf> {
        self.lock_search_path().clone()
    }
}
