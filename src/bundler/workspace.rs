//! Filesystem locations owned by one hook run.
//!
//! The build directory, output destination, and symbol destination are the
//! only shared state of the pipeline. They are resolved once, from the
//! sandbox root, and passed to every stage through a [`Workspace`].

use crate::bundler::{
    Result,
    error::ErrorExt,
    utils::fs,
};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Folder receiving collected frameworks, libraries, and resources.
pub const DESTINATION_DIR: &str = "BinaryPods";
/// Folder (next to the sandbox) receiving symbol bundles.
pub const SYMBOL_DIR: &str = "dSYM";
/// Folder (next to the sandbox) used as derived data.
pub const BUILD_DIR: &str = "build";

/// Owned handle to the directories one run reads and writes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Workspace {
    build_dir: PathBuf,
    destination: PathBuf,
    symbol_destination: PathBuf,
}

impl Workspace {
    /// Resolve the standard layout around a pods sandbox:
    ///
    /// - build directory: `<sandbox>/../build`
    /// - destination: `<sandbox>/../../../BinaryPods`
    /// - symbol destination: `<sandbox>/../dSYM`
    ///
    /// Paths are made absolute against the current directory and `..`
    /// components are resolved lexically.
    pub fn for_sandbox(sandbox_root: &Path) -> Result<Self> {
        let sandbox = sandbox_root
            .absolutize()
            .fs_context("resolving sandbox root", sandbox_root)?
            .into_owned();
        let project_dir = sandbox.parent().unwrap_or(&sandbox).to_path_buf();

        let destination = project_dir
            .join("../..")
            .join(DESTINATION_DIR)
            .absolutize()
            .fs_context("resolving destination", &project_dir)?
            .into_owned();

        Ok(Self {
            build_dir: project_dir.join(BUILD_DIR),
            destination,
            symbol_destination: project_dir.join(SYMBOL_DIR),
        })
    }

    /// Workspace with explicit locations.
    pub fn new(build_dir: PathBuf, destination: PathBuf, symbol_destination: PathBuf) -> Self {
        Self {
            build_dir,
            destination,
            symbol_destination,
        }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn symbol_destination(&self) -> &Path {
        &self.symbol_destination
    }

    /// Remove any stale build directory and return a guard that removes it
    /// again when dropped.
    ///
    /// The directory itself is not created; the toolchain creates it.
    pub async fn fresh_build_dir(&self) -> Result<BuildDirGuard> {
        fs::remove_dir_all(&self.build_dir).await?;
        Ok(BuildDirGuard {
            path: Some(self.build_dir.clone()),
        })
    }
}

/// Removes the build directory on every exit path.
///
/// Call [`BuildDirGuard::cleanup`] on the success path to surface removal
/// errors; if the guard is dropped instead (early return, `?`, panic) the
/// directory is removed synchronously and failures are only logged.
#[derive(Debug)]
#[must_use = "dropping the guard removes the build directory immediately"]
pub struct BuildDirGuard {
    path: Option<PathBuf>,
}

impl BuildDirGuard {
    /// Remove the build directory now, reporting failures.
    pub async fn cleanup(mut self) -> Result<()> {
        match self.path.take() {
            Some(path) => fs::remove_dir_all(&path).await,
            None => Ok(()),
        }
    }
}

impl Drop for BuildDirGuard {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        match std::fs::remove_dir_all(&path) {
            Ok(()) => log::debug!("Removed build directory {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove build directory {}: {}", path.display(), e),
        }
    }
}
