//! Merging per-platform frameworks into one xcframework.

use crate::bundler::{
    Result,
    process::{CommandRunner, Invocation, execute},
};
use std::path::{Path, PathBuf};

/// Which candidate frameworks must exist for a merge to go ahead.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MergePolicy {
    /// Merge only when every candidate exists; otherwise skip the module.
    #[default]
    RequireAll,
    /// Merge whichever candidates exist; skip only when none do.
    AvailableOnly,
}

impl MergePolicy {
    /// Split candidates into (inputs to merge, missing paths).
    ///
    /// Returns `None` for the inputs when the merge must be skipped.
    pub fn select_inputs(self, candidates: &[PathBuf]) -> (Option<Vec<PathBuf>>, Vec<PathBuf>) {
        let (present, missing): (Vec<PathBuf>, Vec<PathBuf>) =
            candidates.iter().cloned().partition(|path| path.exists());

        let inputs = match self {
            MergePolicy::RequireAll if !missing.is_empty() => None,
            _ if present.is_empty() => None,
            _ => Some(present),
        };
        (inputs, missing)
    }
}

/// Result of one merge attempt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MergeOutcome {
    /// The merge tool produced this xcframework.
    Merged(PathBuf),
    /// The xcframework already existed; nothing was run.
    AlreadyPresent(PathBuf),
    /// Required inputs were missing; nothing was produced.
    Incomplete { missing: Vec<PathBuf> },
}

/// `<output_dir>/<module_name>.xcframework`
pub fn xcframework_path(output_dir: &Path, module_name: &str) -> PathBuf {
    output_dir.join(format!("{}.xcframework", module_name))
}

/// Merge `candidates` into `<output_dir>/<module_name>.xcframework`.
///
/// An existing output is left untouched, without validating its contents.
/// Missing candidates are not an error: the merge is skipped according to
/// `policy` and reported as [`MergeOutcome::Incomplete`]. `-framework` flags
/// follow the order of `candidates`.
pub async fn merge(
    runner: &dyn CommandRunner,
    candidates: &[PathBuf],
    output_dir: &Path,
    module_name: &str,
    policy: MergePolicy,
) -> Result<MergeOutcome> {
    let output = xcframework_path(output_dir, module_name);
    if output.exists() {
        log::debug!("{} already exists, skipping merge", output.display());
        return Ok(MergeOutcome::AlreadyPresent(output));
    }

    let (inputs, missing) = policy.select_inputs(candidates);
    let Some(inputs) = inputs else {
        for path in &missing {
            log::info!("Skipping {}: {} was not built", module_name, path.display());
        }
        return Ok(MergeOutcome::Incomplete { missing });
    };

    let mut invocation = Invocation::new("xcodebuild")
        .arg("-create-xcframework")
        .arg("-output")
        .arg(output.display().to_string());
    for framework in &inputs {
        invocation = invocation.arg("-framework").arg(framework.display().to_string());
    }

    execute(runner, &invocation).await?;
    log::info!("✓ Created {}", output.display());
    Ok(MergeOutcome::Merged(output))
}
