//! Tool acquisition for the Copilot CLI.
//!
//! # Architecture
//!
//! - [`Platform`], [`Os`], [`Arch`] - platform identification for release assets
//! - [`ToolDescriptor`], [`CachedTool`] - what is installed and where
//! - [`CliDistribution`] - the fixed upstream coordinates of the CLI
//! - [`ToolStore`] - host-level cache plus executable search path
//! - [`ReleaseSource`] and [`resolve_version`] - version resolution
//! - [`ArtifactDownloader`] and [`Acquirer`] - download and registration
//!
//! # Example
//!
//! ```ignore
//! use copilot_action_core::tools::{Acquirer, CliDistribution, Platform, resolve_version};
//!
//! let version = resolve_version(None, &releases, &distribution).await?;
//! let descriptor = distribution.descriptor(version);
//! let path = match store.find(&descriptor) {
//!     Some(path) => path,
//!     None => acquirer.acquire(&descriptor, &Platform::current()).await?,
//! };
//! ```

mod acquire;
mod descriptor;
mod platform;
mod release;
mod store;

pub use acquire::{Acquirer, ArtifactDownloader};
pub use descriptor::{CachedTool, CliDistribution, ToolDescriptor};
pub use platform::{Arch, Os, Platform};
pub use release::{ReleaseSource, resolve_version};
pub use store::ToolStore;
