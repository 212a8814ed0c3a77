//! Error types for the build, merge, and collection pipeline.
//!
//! Every fatal condition of a hook run has a named variant here. The one
//! intentionally swallowed condition, a module with incomplete platform
//! coverage, is not an error and is reported through
//! [`MergeOutcome`](crate::bundler::MergeOutcome) instead.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, merging, or collecting artifacts.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An umbrella target declares a platform the pipeline cannot build.
    #[error("Unknown platform '{platform}' for target `{target}`")]
    UnsupportedPlatform {
        /// Umbrella target label
        target: String,
        /// Platform identifier as supplied by the install context
        platform: String,
    },

    /// A toolchain subprocess exited with a nonzero status.
    #[error("`{command}` failed ({status})\n{stderr}")]
    Toolchain {
        /// Full command line
        command: String,
        /// Human readable exit status
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The toolchain finished without producing the build directory.
    #[error("The build directory was not found in the expected location: {}", .0.display())]
    MissingBuildDirectory(PathBuf),

    /// A target in the project descriptor has no configuration of the requested name.
    #[error(
        "Build configuration `{configuration}` not found for target `{target}` in {}",
        project.display()
    )]
    MissingConfiguration {
        /// Project descriptor path
        project: PathBuf,
        /// Target name
        target: String,
        /// Requested configuration name
        configuration: String,
    },

    /// The project descriptor does not have the expected object graph.
    #[error("Malformed project descriptor {}: {reason}", path.display())]
    MalformedProject {
        /// Project descriptor path
        path: PathBuf,
        /// What was missing or mistyped
        reason: String,
    },

    /// No simulator is available for a platform/deployment target pair.
    #[error("No available {platform} simulator with a runtime of at least {deployment_target}")]
    NoSimulator {
        /// Simulator platform family (iOS, tvOS, watchOS)
        platform: String,
        /// Minimum runtime version
        deployment_target: String,
    },

    /// A required executable is not on PATH.
    #[error("Required tool `{0}` was not found in PATH")]
    ToolNotFound(String),

    /// A user-supplied lifecycle callback failed.
    #[error("{phase} callback `{command}` failed: {reason}")]
    Callback {
        /// Lifecycle point
        phase: String,
        /// Callback command line
        command: String,
        /// Failure description
        reason: String,
    },

    /// Filesystem operation failed on a specific path.
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// Operation being performed
        context: String,
        /// Path the operation was performed on
        path: PathBuf,
        /// Underlying error
        error: io::Error,
    },

    /// Generic error with a message.
    #[error("{0}")]
    GenericError(String),

    /// I/O error.
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// Glob iteration error.
    #[error(transparent)]
    Glob(#[from] glob::GlobError),

    /// Invalid glob pattern.
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    /// Property list read/write error.
    #[error(transparent)]
    Plist(#[from] plist::Error),

    /// JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Directory walk error.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error(transparent)]
    StripPrefix(#[from] std::path::StripPrefixError),
}

/// Attaches the operation and path to an I/O failure.
pub trait ErrorExt<T> {
    /// Converts the error into [`Error::Fs`].
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Prefixes an error message with lazily computed context.
pub trait Context<T> {
    /// Wraps the error in [`Error::GenericError`] with `context` in front.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::GenericError(format!("{}: {}", f(), e)))
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
