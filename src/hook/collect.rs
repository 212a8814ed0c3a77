//! Gathering merged xcframeworks and vendored files into the destination.

use crate::bundler::{Error, Result, error::Context, utils::fs};
use crate::context::InstallContext;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Umbrella xcframeworks built from the aggregate `Pods-*` targets are never collected.
const UMBRELLA_PATTERN: &str = r"Pods[^.]+\.xcframework";

/// Everything copied to the destination, in copy order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Collection {
    /// Merged xcframeworks followed by vendored libraries and frameworks
    pub frameworks: Vec<PathBuf>,
    pub resources: Vec<PathBuf>,
}

impl Collection {
    /// Start from the xcframeworks found in `build_dir`.
    pub fn from_build_dir(build_dir: &Path) -> Result<Self> {
        Ok(Self {
            frameworks: discover_xcframeworks(build_dir)?,
            resources: Vec::new(),
        })
    }

    /// Append every spec's vendored libraries, vendored frameworks and
    /// resources, then drop duplicates keeping the first occurrence.
    pub fn add_vendored(&mut self, context: &InstallContext) -> Result<()> {
        for target in &context.umbrella_targets {
            for spec in &target.specs {
                let accessor = context.file_accessor(spec);
                let describe = || format!("resolving files of {}", spec.name);
                self.frameworks
                    .extend(accessor.vendored_libraries().with_context(describe)?);
                self.frameworks
                    .extend(accessor.vendored_frameworks().with_context(describe)?);
                self.resources
                    .extend(accessor.resources().with_context(describe)?);
            }
        }
        self.frameworks = dedupe(std::mem::take(&mut self.frameworks));
        self.resources = dedupe(std::mem::take(&mut self.resources));
        Ok(())
    }

    pub fn items(&self) -> impl Iterator<Item = &PathBuf> {
        self.frameworks.iter().chain(&self.resources)
    }
}

/// `<build_dir>/*/*/*.xcframework` then `<build_dir>/*.xcframework`,
/// leaving out umbrella `Pods-*` xcframeworks.
pub fn discover_xcframeworks(build_dir: &Path) -> Result<Vec<PathBuf>> {
    let umbrella = Regex::new(UMBRELLA_PATTERN)
        .map_err(|e| Error::GenericError(format!("Failed to compile regex: {e}")))?;
    let root = glob::Pattern::escape(&build_dir.to_string_lossy());

    let mut found = Vec::new();
    for pattern in ["*/*/*.xcframework", "*.xcframework"] {
        let mut matches = glob::glob(&format!("{}/{}", root, pattern))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        matches.sort();
        found.extend(matches.into_iter().filter(|path| {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            !umbrella.is_match(&name)
        }));
    }
    Ok(found)
}

/// Keep the first occurrence of every path.
pub fn dedupe(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths.into_iter().filter(|p| seen.insert(p.clone())).collect()
}

/// Recreate `destination` and copy every item into it.
///
/// Whatever the destination held before is discarded. Returns the copied paths.
pub async fn copy_to_destination<'a>(
    items: impl IntoIterator<Item = &'a PathBuf>,
    destination: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(destination, true).await?;

    let mut copied = Vec::new();
    for item in items {
        copied.push(fs::copy_into(item, destination).await?);
    }
    Ok(copied)
}
