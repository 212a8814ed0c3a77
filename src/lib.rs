//! Prebuild installed CocoaPods dependencies into xcframeworks
//!
//! This library provides the post-install hook that:
//! - builds every pod for iOS device, Mac Catalyst and the iOS simulator
//! - merges each module into one `.xcframework`
//! - collects xcframeworks, vendored files, resources and `.dSYM` bundles
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod context;
pub mod error;
pub mod hook;

// Re-export commonly used types
pub use context::InstallContext;
pub use error::{CliError, Result, RomeError};
pub use hook::{HookReport, PostInstallHook};
