//! External tool detection and availability checking.
//!
//! Every build shells out to the Apple toolchain. Checking for it up front
//! turns a missing Xcode installation into one clear error instead of a
//! spawn failure halfway through a build.

use crate::bundler::{Error, Result};
use std::path::PathBuf;

/// Executables the pipeline invokes.
pub const REQUIRED_TOOLS: [&str; 2] = ["xcodebuild", "xcrun"];

/// Resolve `tool` on `PATH`.
pub fn locate(tool: &str) -> Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Ok(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            Err(Error::ToolNotFound(tool.to_string()))
        }
    }
}

/// Fail with [`Error::ToolNotFound`] for the first of `tools` that is not on `PATH`.
pub fn ensure_tools(tools: &[&str]) -> Result<()> {
    for tool in tools {
        locate(tool)?;
    }
    log::info!("✓ Toolchain available: {}", tools.join(", "));
    Ok(())
}

/// [`ensure_tools`] for [`REQUIRED_TOOLS`].
pub fn ensure_toolchain() -> Result<()> {
    ensure_tools(&REQUIRED_TOOLS)
}
