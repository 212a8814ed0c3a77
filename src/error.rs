//! Application level error types.
//!
//! This module wraps pipeline errors together with CLI, I/O and parsing
//! failures, and maps each to actionable recovery suggestions.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, RomeError>;

/// Main error type for a `pods-rome` invocation
#[derive(Error, Debug)]
pub enum RomeError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors (context snapshot)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors (options file)
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Build, merge or collection errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Failures carrying added context, such as an unreadable options file
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl RomeError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error;

        match self {
            RomeError::Bundler(Error::ToolNotFound(tool)) => vec![
                format!("Install Xcode and make sure `{}` is on PATH", tool),
                "Select the toolchain with `sudo xcode-select --switch /Applications/Xcode.app`"
                    .to_string(),
            ],
            RomeError::Bundler(Error::UnsupportedPlatform { .. }) => vec![
                "Only iOS umbrella targets can be prebuilt; remove the plugin from other targets"
                    .to_string(),
            ],
            RomeError::Bundler(Error::NoSimulator { platform, deployment_target }) => vec![format!(
                "Install a {} simulator runtime of version {} or later (Xcode > Settings > Platforms)",
                platform, deployment_target
            )],
            RomeError::Bundler(Error::MissingConfiguration { configuration, .. }) => vec![format!(
                "Check that every pod target defines the `{}` configuration, or pass --configuration",
                configuration
            )],
            RomeError::Bundler(Error::Toolchain { .. }) => vec![
                "Re-run with RUST_LOG=debug to see the full xcodebuild output".to_string(),
            ],
            RomeError::Bundler(Error::MissingBuildDirectory(_)) => vec![
                "Make sure at least one umbrella target bundles pods".to_string(),
            ],
            RomeError::Json(_) => vec![
                "The context snapshot must be the JSON written by the install hook shim"
                    .to_string(),
            ],
            RomeError::Toml(_) => vec![
                "Valid option keys are dsym, configuration, flags, pre_compile and post_compile"
                    .to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
