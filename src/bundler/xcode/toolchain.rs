//! `xcodebuild` invocations for one scheme and SDK.

use super::simctl::SimControl;
use crate::bundler::{
    Result,
    process::{CommandRunner, Invocation, execute},
    settings::Sdk,
};
use std::path::{Path, PathBuf};

/// Builds schemes of one project into one derived-data directory.
pub struct Toolchain<'a> {
    runner: &'a dyn CommandRunner,
    project_path: PathBuf,
    derived_data: PathBuf,
}

impl<'a> Toolchain<'a> {
    /// # Arguments
    ///
    /// * `project_path` - `.xcodeproj` bundle containing the schemes
    /// * `derived_data` - directory passed as `-derivedDataPath`
    pub fn new(runner: &'a dyn CommandRunner, project_path: &Path, derived_data: &Path) -> Self {
        Self {
            runner,
            project_path: project_path.to_path_buf(),
            derived_data: derived_data.to_path_buf(),
        }
    }

    /// Arguments common to every build, before flags and destination.
    pub fn base_args(&self, scheme: &str, sdk: Sdk, configuration: &str) -> Vec<String> {
        vec![
            "-derivedDataPath".to_string(),
            self.derived_data.display().to_string(),
            "-project".to_string(),
            self.project_path.display().to_string(),
            "-scheme".to_string(),
            scheme.to_string(),
            "-configuration".to_string(),
            configuration.to_string(),
            "-sdk".to_string(),
            sdk.identifier().to_string(),
        ]
    }

    /// Build `scheme` for `sdk`.
    ///
    /// Simulator SDKs get a `-destination` naming the oldest simulator that
    /// satisfies `deployment_target`. A nonzero exit is returned as
    /// [`Error::Toolchain`](crate::bundler::Error::Toolchain) and never retried.
    pub async fn invoke(
        &self,
        scheme: &str,
        sdk: Sdk,
        deployment_target: &str,
        flags: &[String],
        configuration: &str,
    ) -> Result<()> {
        let mut args = self.base_args(scheme, sdk, configuration);
        args.extend(flags.iter().cloned());

        if let Some(platform) = sdk.simulator_platform() {
            let destination = SimControl::new(self.runner)
                .oldest_destination(platform, deployment_target)
                .await?;
            args.extend(destination);
        }

        execute(self.runner, &Invocation::new("xcodebuild").args(&args)).await?;
        Ok(())
    }
}
