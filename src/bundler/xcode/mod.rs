//! Apple toolchain integration.
//!
//! - [`toolchain`] - `xcodebuild` builds for one scheme and SDK
//! - [`simctl`] - simulator destination selection
//! - [`xcframework`] - merging per-platform frameworks
//! - [`project`] - build setting edits on `project.pbxproj`

pub mod project;
pub mod simctl;
pub mod toolchain;
pub mod xcframework;

pub use project::enable_debug_information;
pub use simctl::SimControl;
pub use toolchain::Toolchain;
pub use xcframework::{MergeOutcome, MergePolicy, merge, xcframework_path};
