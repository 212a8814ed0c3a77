//! Prebuilding installed pods into xcframeworks.
//!
//! - [`builder`] - per-target SDK builds and merges ([`Orchestrator`])
//! - [`xcode`] - `xcodebuild`, `simctl`, merge tool and project descriptor edits
//! - [`settings`] - hook options, umbrella targets, SDKs and slices
//! - [`process`] - the [`CommandRunner`](process::CommandRunner) seam for subprocesses
//! - [`workspace`] - build, destination and symbol directories
//! - [`utils`] - filesystem helpers

pub mod builder;
pub mod error;
pub mod process;
pub mod settings;
pub mod utils;
pub mod workspace;
pub mod xcode;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{BuildReport, Orchestrator};
pub use error::{Error, Result};
pub use settings::{BuildTarget, HookOptions, PackageSpec, Platform, Sdk, Slice};
pub use workspace::{BuildDirGuard, Workspace};
pub use xcode::{MergeOutcome, MergePolicy};
