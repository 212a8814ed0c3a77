//! Build orchestration across SDKs and modules.
//!
//! This module provides the [`Orchestrator`] that turns umbrella targets into
//! one merged xcframework per unique module.

use crate::bundler::{
    BuildTarget, Result, Slice,
    process::CommandRunner,
    utils::fs,
    xcode::{MergeOutcome, MergePolicy, Toolchain, merge},
};
use std::path::{Path, PathBuf};

/// What happened to each module during [`Orchestrator::build_all`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BuildReport {
    /// xcframeworks created by this run
    pub merged: Vec<PathBuf>,
    /// xcframeworks that already existed and were kept
    pub already_present: Vec<PathBuf>,
    /// Modules skipped because a platform slice was not built
    pub skipped: Vec<String>,
}

/// Drives the toolchain and the merger for a set of umbrella targets.
///
/// Everything runs sequentially: one SDK build at a time, one module at a
/// time. The first toolchain or merge failure aborts the run.
pub struct Orchestrator<'a> {
    runner: &'a dyn CommandRunner,
    toolchain: Toolchain<'a>,
    build_dir: PathBuf,
    configuration: String,
    flags: Vec<String>,
    policy: MergePolicy,
}

impl<'a> Orchestrator<'a> {
    /// # Arguments
    ///
    /// * `project_path` - `.xcodeproj` with one scheme per umbrella target
    /// * `build_dir` - derived-data directory; merged xcframeworks land here too
    /// * `configuration` - build configuration name
    /// * `flags` - extra flags appended to every SDK build
    pub fn new(
        runner: &'a dyn CommandRunner,
        project_path: &Path,
        build_dir: &Path,
        configuration: &str,
        flags: &[String],
    ) -> Self {
        Self {
            runner,
            toolchain: Toolchain::new(runner, project_path, build_dir),
            build_dir: build_dir.to_path_buf(),
            configuration: configuration.to_string(),
            flags: flags.to_vec(),
            policy: MergePolicy::default(),
        }
    }

    /// Replace the default [`MergePolicy::RequireAll`].
    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build and merge every target.
    ///
    /// Platforms are validated for all targets before anything is built, so
    /// an unsupported platform fails with zero toolchain invocations.
    pub async fn build_all(&self, targets: &[&BuildTarget]) -> Result<BuildReport> {
        for target in targets {
            target.ensure_supported()?;
        }

        let mut report = BuildReport::default();
        for target in targets {
            self.build_target(target, &mut report).await?;
        }
        Ok(report)
    }

    async fn build_target(&self, target: &BuildTarget, report: &mut BuildReport) -> Result<()> {
        for slice in Slice::ALL {
            log::info!("Building framework for {}", slice.description());
            let flags = self.slice_flags(slice);
            self.toolchain
                .invoke(
                    &target.label,
                    slice.sdk(),
                    &target.deployment_target,
                    &flags,
                    &self.configuration,
                )
                .await?;
        }

        for (root_name, module_name) in target.unique_modules() {
            let candidates: Vec<PathBuf> = Slice::ALL
                .iter()
                .map(|slice| {
                    slice.framework_path(
                        &self.build_dir,
                        &self.configuration,
                        &root_name,
                        &module_name,
                    )
                })
                .collect();

            log::info!("Building xcframework");
            let outcome = merge(
                self.runner,
                &candidates,
                &self.build_dir,
                &module_name,
                self.policy,
            )
            .await?;

            for intermediate in &candidates {
                fs::remove_path(intermediate).await?;
            }

            match outcome {
                MergeOutcome::Merged(path) => report.merged.push(path),
                MergeOutcome::AlreadyPresent(path) => report.already_present.push(path),
                MergeOutcome::Incomplete { .. } => report.skipped.push(module_name),
            }
        }
        Ok(())
    }

    /// Fixed flags for the slice followed by the configured flags it does not already carry.
    fn slice_flags(&self, slice: Slice) -> Vec<String> {
        let mut flags = slice.build_flags();
        for flag in &self.flags {
            if !flags.contains(flag) {
                flags.push(flag.clone());
            }
        }
        flags
    }
}
