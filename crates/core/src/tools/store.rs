//! Host-level tool cache and executable search path.

use std::path::{Path, PathBuf};

use super::descriptor::ToolDescriptor;
use crate::Result;

/// Host-level store for installed tools.
///
/// Implementations own two pieces of state that outlive a single function call:
/// the cache mapping descriptors to installed directories, and the executable
/// search path that child processes (and later workflow steps) resolve the tool
/// from.
pub trait ToolStore: Send + Sync {
    /// Look up the installed directory for a descriptor.
    ///
    /// Returns `None` on a miss; lookups never fail.
    fn find(&self, descriptor: &ToolDescriptor) -> Option<PathBuf>;

    /// Register a downloaded file under `descriptor`.
    ///
    /// The file is copied into a stable cache-managed directory as
    /// `executable_name`. Returns that directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be copied into the cache.
    fn register(
        &self,
        descriptor: &ToolDescriptor,
        source: &Path,
        executable_name: &str,
    ) -> Result<PathBuf>;

    /// Append a directory to the executable search path.
    ///
    /// # Errors
    ///
    /// Returns an error if the host search path cannot be updated.
    fn append_to_search_path(&self, dir: &Path) -> Result<()>;

    /// Directories appended during this run, oldest first.
    fn search_path(&self) -> Vec<PathBuf>;
}
