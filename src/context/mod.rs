//! Install context snapshots handed over by the package manager.
//!
//! The host serializes what it knows about the finished install (sandbox
//! location, umbrella targets, and the specs each one bundles) to JSON before
//! invoking the hook. This module loads that snapshot and resolves each
//! spec's vendored and resource patterns against its pod directory.

use crate::bundler::{self, BuildTarget, PackageSpec};
use crate::error::{CliError, Result, RomeError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Snapshot of the host's install context.
///
/// ```json
/// {
///   "sandbox_root": "/Users/dev/app/ios/Pods",
///   "umbrella_targets": [{
///     "platform": "ios",
///     "label": "Pods-App",
///     "deployment_target": "13.0",
///     "specs": [{ "name": "Alamofire", "root_name": "Alamofire" }]
///   }]
/// }
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct InstallContext {
    /// Pods sandbox directory
    pub sandbox_root: PathBuf,

    /// Generated project; `<sandbox_root>/Pods.xcodeproj` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<PathBuf>,

    /// Umbrella targets in install order
    #[serde(default)]
    pub umbrella_targets: Vec<BuildTarget>,
}

impl InstallContext {
    /// Read a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            RomeError::Cli(CliError::ExecutionFailed {
                command: "read_context".to_string(),
                reason: format!("Failed to read {}: {}", path.display(), e),
            })
        })?;
        let context = Self::from_json(&json)?;
        log::debug!(
            "Loaded install context with {} umbrella target(s) from {}",
            context.umbrella_targets.len(),
            path.display()
        );
        Ok(context)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialized form handed to lifecycle callbacks.
    pub fn to_json(&self) -> bundler::Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn project_path(&self) -> PathBuf {
        self.project_path
            .clone()
            .unwrap_or_else(|| self.sandbox_root.join("Pods.xcodeproj"))
    }

    /// Directory a pod was installed into.
    pub fn pod_dir(&self, root_name: &str) -> PathBuf {
        self.sandbox_root.join(root_name)
    }

    /// Umbrella targets that bundle at least one spec.
    pub fn buildable_targets(&self) -> Vec<&BuildTarget> {
        self.umbrella_targets
            .iter()
            .filter(|target| !target.specs.is_empty())
            .collect()
    }

    /// Fail on the first buildable target whose platform is not supported.
    pub fn validate_platforms(&self) -> bundler::Result<()> {
        self.buildable_targets()
            .iter()
            .try_for_each(|target| target.ensure_supported())
    }

    pub fn file_accessor<'a>(&self, spec: &'a PackageSpec) -> FileAccessor<'a> {
        FileAccessor {
            pod_dir: self.pod_dir(&spec.root_name),
            spec,
        }
    }
}

/// Resolves one spec's file patterns inside its pod directory.
///
/// Patterns are globs relative to the pod directory; `{a,b}` alternatives
/// are expanded before matching. Each pattern's matches are sorted, and a
/// path matched by several patterns is returned once.
pub struct FileAccessor<'a> {
    pod_dir: PathBuf,
    spec: &'a PackageSpec,
}

impl FileAccessor<'_> {
    pub fn vendored_libraries(&self) -> bundler::Result<Vec<PathBuf>> {
        resolve(&self.pod_dir, &self.spec.vendored_libraries)
    }

    pub fn vendored_frameworks(&self) -> bundler::Result<Vec<PathBuf>> {
        resolve(&self.pod_dir, &self.spec.vendored_frameworks)
    }

    pub fn resources(&self) -> bundler::Result<Vec<PathBuf>> {
        resolve(&self.pod_dir, &self.spec.resources)
    }
}

fn resolve(root: &Path, patterns: &[String]) -> bundler::Result<Vec<PathBuf>> {
    // Only the spec pattern is a glob; the root is matched literally
    let base = glob::Pattern::escape(&root.to_string_lossy());
    let mut seen = HashSet::new();
    let mut paths = Vec::new();
    for pattern in patterns {
        for expanded in expand_braces(pattern) {
            let full = format!("{}/{}", base.trim_end_matches('/'), expanded);
            let mut matches = glob::glob(&full)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            if matches.is_empty() {
                log::debug!("Pattern {} matched nothing in {}", expanded, root.display());
            }
            matches.sort();
            paths.extend(matches.into_iter().filter(|p| seen.insert(p.clone())));
        }
    }
    Ok(paths)
}

/// Expand `{a,b}` alternatives: `Assets/*.{png,xib}` yields
/// `Assets/*.png` and `Assets/*.xib`. Nested groups are expanded too.
fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        let at = open + i;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(at);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(at),
            _ => {}
        }
    }
    // Unbalanced braces are left for glob to reject
    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| expand_braces(&format!("{}{}{}", prefix, &pattern[w[0] + 1..w[1]], suffix)))
        .collect()
}
