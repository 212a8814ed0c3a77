//! The post-install hook.
//!
//! [`PostInstallHook::run`] is the single entry point the package manager
//! triggers once dependencies are installed. One run:
//!
//! 1. runs the pre-compile callback
//! 2. enables separate debug symbols in the generated project (when `dsym` is set)
//! 3. builds every buildable umbrella target for device, Mac Catalyst and
//!    simulator, merging each module into an xcframework
//! 4. copies the xcframeworks plus vendored libraries, frameworks and
//!    resources into the destination directory
//! 5. copies `.dSYM` bundles into the symbol directory (when `dsym` is set)
//! 6. removes the build directory and runs the post-compile callback
//!
//! The build directory is removed on every exit path, including failures.

pub mod collect;
pub mod dsym;
pub mod lifecycle;

pub use collect::Collection;
pub use lifecycle::{CommandHook, LifecycleHook, NoopHook, Phase};

use crate::bundler::{
    BuildReport, Error, HookOptions, Orchestrator, Result, Workspace,
    process::CommandRunner,
    xcode::{MergePolicy, enable_debug_information},
};
use crate::context::InstallContext;
use std::path::{Path, PathBuf};

/// What a successful run produced.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HookReport {
    pub build: BuildReport,
    /// Paths created in the destination directory
    pub copied: Vec<PathBuf>,
    /// Symbol bundles created in the symbol directory
    pub symbols: Vec<PathBuf>,
}

/// Configured post-install hook.
pub struct PostInstallHook<'a> {
    runner: &'a dyn CommandRunner,
    options: HookOptions,
    pre_compile: Box<dyn LifecycleHook>,
    post_compile: Box<dyn LifecycleHook>,
    policy: MergePolicy,
    workspace: Option<Workspace>,
}

impl<'a> PostInstallHook<'a> {
    /// Hook with callbacks taken from `options`.
    pub fn new(runner: &'a dyn CommandRunner, options: HookOptions) -> Self {
        Self {
            runner,
            pre_compile: CommandHook::boxed(options.pre_compile.as_deref()),
            post_compile: CommandHook::boxed(options.post_compile.as_deref()),
            options,
            policy: MergePolicy::default(),
            workspace: None,
        }
    }

    /// Replace the callbacks.
    pub fn with_callbacks(
        mut self,
        pre_compile: Box<dyn LifecycleHook>,
        post_compile: Box<dyn LifecycleHook>,
    ) -> Self {
        self.pre_compile = pre_compile;
        self.post_compile = post_compile;
        self
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use explicit locations instead of the layout derived from the sandbox root.
    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = Some(workspace);
        self
    }

    /// Run the whole pipeline for `context`.
    pub async fn run(&self, context: &InstallContext) -> Result<HookReport> {
        // Nothing may be touched before an unsupported platform is reported
        context.validate_platforms()?;

        let workspace = match &self.workspace {
            Some(workspace) => workspace.clone(),
            None => Workspace::for_sandbox(&context.sandbox_root)?,
        };
        let configuration = self.options.configuration.as_str();
        let flags = self.options.toolchain_flags();
        let build_dir = workspace.build_dir();
        let guard = workspace.fresh_build_dir().await?;

        self.pre_compile
            .call(Phase::PreCompile, context, self.runner)
            .await?;

        if self.options.dsym {
            enable_debug_information(&context.project_path(), configuration)?;
        }

        log::info!("Building frameworks");

        let build = Orchestrator::new(
            self.runner,
            &context.project_path(),
            build_dir,
            configuration,
            &flags,
        )
        .with_policy(self.policy)
        .build_all(&context.buildable_targets())
        .await?;

        if !build_dir.is_dir() {
            return Err(Error::MissingBuildDirectory(build_dir.to_path_buf()));
        }

        let mut collection = Collection::from_build_dir(build_dir)?;
        log::info!("Built {}", plural(collection.frameworks.len(), "framework"));

        collection.add_vendored(context)?;
        log::info!(
            "Copying {} to `{}`",
            plural(collection.frameworks.len(), "framework"),
            display_relative(workspace.destination())
        );
        let copied =
            collect::copy_to_destination(collection.items(), workspace.destination()).await?;

        let symbols = if self.options.dsym {
            dsym::copy_symbol_bundles(build_dir, configuration, workspace.symbol_destination())
                .await?
        } else {
            Vec::new()
        };

        guard.cleanup().await?;

        self.post_compile
            .call(Phase::PostCompile, context, self.runner)
            .await?;

        log::info!(
            "✓ Copied {} item(s) to {}",
            copied.len(),
            workspace.destination().display()
        );
        Ok(HookReport {
            build,
            copied,
            symbols,
        })
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// `path` relative to the current directory when it lies below it.
fn display_relative(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(|p| p.display().to_string()))
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::testing::{FakeXcode, write_project};
    use crate::bundler::{BuildTarget, PackageSpec, Platform, Slice};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        root: PathBuf,
        context: InstallContext,
    }

    impl Fixture {
        /// `<root>/app/ios/Pods` sandbox with a generated project and pod `Foo`.
        fn new(targets: Vec<BuildTarget>) -> Self {
            let dir = TempDir::new().unwrap();
            let root = dir.path().to_path_buf();
            let sandbox = root.join("app/ios/Pods");
            std::fs::create_dir_all(sandbox.join("Foo/lib")).unwrap();
            std::fs::write(sandbox.join("Foo/lib/libFooCore.a"), "archive").unwrap();
            write_project(
                &sandbox,
                &[("Foo", &["Debug", "Release"]), ("Pods-App", &["Debug", "Release"])],
            );

            Self {
                _dir: dir,
                root,
                context: InstallContext {
                    sandbox_root: sandbox,
                    project_path: None,
                    umbrella_targets: targets,
                },
            }
        }

        fn destination(&self) -> PathBuf {
            self.root.join("BinaryPods")
        }

        fn build_dir(&self) -> PathBuf {
            self.root.join("app/ios/build")
        }

        fn symbols(&self) -> PathBuf {
            self.root.join("app/ios/dSYM")
        }
    }

    fn foo_target(platform: Platform) -> BuildTarget {
        BuildTarget {
            platform,
            label: "Pods-App".into(),
            deployment_target: "13.0".into(),
            specs: vec![
                PackageSpec {
                    name: "Foo/Core".into(),
                    root_name: "Foo".into(),
                    module_name: Some("Foo".into()),
                    vendored_libraries: vec!["lib/*.a".into()],
                    ..Default::default()
                },
                PackageSpec {
                    name: "Foo/Extras".into(),
                    root_name: "Foo".into(),
                    module_name: Some("Foo".into()),
                    ..Default::default()
                },
            ],
        }
    }

    #[derive(Clone, Default)]
    struct RecordingHook(Arc<Mutex<Vec<Phase>>>);

    #[async_trait]
    impl LifecycleHook for RecordingHook {
        async fn call(
            &self,
            phase: Phase,
            _: &InstallContext,
            _: &dyn CommandRunner,
        ) -> Result<()> {
            self.0.lock().unwrap().push(phase);
            Ok(())
        }
    }

    struct FailingHook;

    #[async_trait]
    impl LifecycleHook for FailingHook {
        async fn call(
            &self,
            phase: Phase,
            _: &InstallContext,
            _: &dyn CommandRunner,
        ) -> Result<()> {
            Err(Error::Callback {
                phase: phase.as_str().to_string(),
                command: "exit 3".into(),
                reason: "exit code 3: ".into(),
            })
        }
    }

    #[tokio::test]
    async fn builds_merges_and_collects_into_destination() {
        let fixture = Fixture::new(vec![foo_target(Platform::Ios)]);
        std::fs::create_dir_all(fixture.destination().join("Stale.xcframework")).unwrap();
        let runner = FakeXcode::new().with_module("Foo", "Foo");
        let calls = RecordingHook::default();

        let report = PostInstallHook::new(&runner, HookOptions::default())
            .with_callbacks(Box::new(calls.clone()), Box::new(calls.clone()))
            .run(&fixture.context)
            .await
            .unwrap();

        let merges = runner.merges();
        assert_eq!(merges.len(), 1);
        let args = merges[0].get_args();
        let frameworks: Vec<&String> = args
            .iter()
            .skip_while(|a| *a != "-framework")
            .filter(|a| *a != "-framework")
            .collect();
        assert!(frameworks[0].contains("Debug-iphoneos"));
        assert!(frameworks[1].contains("Debug-maccatalyst"));
        assert!(frameworks[2].contains("Debug-iphonesimulator"));
        assert_eq!(report.build.merged, vec![fixture.build_dir().join("Foo.xcframework")]);

        let destination = fixture.destination();
        assert_eq!(
            report.copied,
            vec![destination.join("Foo.xcframework"), destination.join("libFooCore.a")]
        );
        assert!(destination.join("Foo.xcframework/Info.plist").is_file());
        assert!(!destination.join("Stale.xcframework").exists());

        assert_eq!(
            report.symbols,
            vec![
                fixture.symbols().join("iphoneos/Foo.framework.dSYM"),
                fixture.symbols().join("iphonesimulator/Foo.framework.dSYM"),
            ]
        );
        assert!(!fixture.build_dir().exists());
        assert_eq!(*calls.0.lock().unwrap(), vec![Phase::PreCompile, Phase::PostCompile]);
    }

    #[tokio::test]
    async fn missing_catalyst_slice_copies_only_vendored_files() {
        let fixture = Fixture::new(vec![foo_target(Platform::Ios)]);
        let runner = FakeXcode::new()
            .with_module("Foo", "Foo")
            .without_slice(Slice::Catalyst);

        let report = PostInstallHook::new(&runner, HookOptions::default())
            .run(&fixture.context)
            .await
            .unwrap();

        assert!(runner.merges().is_empty());
        assert_eq!(report.build.skipped, vec!["Foo".to_string()]);
        assert_eq!(report.copied, vec![fixture.destination().join("libFooCore.a")]);
    }

    #[tokio::test]
    async fn unsupported_platform_touches_nothing() {
        let fixture = Fixture::new(vec![
            foo_target(Platform::Ios),
            foo_target(Platform::Other("osx".into())),
        ]);
        let descriptor = fixture.context.project_path().join("project.pbxproj");
        let before = std::fs::read(&descriptor).unwrap();
        let runner = FakeXcode::new().with_module("Foo", "Foo");
        let calls = RecordingHook::default();

        let err = PostInstallHook::new(&runner, HookOptions::default())
            .with_callbacks(Box::new(calls.clone()), Box::new(calls.clone()))
            .run(&fixture.context)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UnsupportedPlatform { .. }));
        assert!(runner.invocations().is_empty());
        assert!(calls.0.lock().unwrap().is_empty());
        assert_eq!(std::fs::read(&descriptor).unwrap(), before);
    }

    #[tokio::test]
    async fn build_dir_is_removed_when_a_build_fails() {
        let fixture = Fixture::new(vec![foo_target(Platform::Ios)]);
        let runner = FakeXcode::new()
            .with_module("Foo", "Foo")
            .failing_sdk("iphonesimulator");
        let calls = RecordingHook::default();

        let err = PostInstallHook::new(&runner, HookOptions::default())
            .with_callbacks(Box::new(NoopHook), Box::new(calls.clone()))
            .run(&fixture.context)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Toolchain { .. }));
        assert!(!fixture.build_dir().exists());
        assert!(calls.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stale_build_dir_is_removed_when_pre_compile_fails() {
        let fixture = Fixture::new(vec![foo_target(Platform::Ios)]);
        std::fs::create_dir_all(fixture.build_dir().join("Debug-iphoneos")).unwrap();
        let runner = FakeXcode::new().with_module("Foo", "Foo");

        let err = PostInstallHook::new(&runner, HookOptions::default())
            .with_callbacks(Box::new(FailingHook), Box::new(NoopHook))
            .run(&fixture.context)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Callback { .. }));
        assert!(runner.invocations().is_empty());
        assert!(!fixture.build_dir().exists());
    }

    #[tokio::test]
    async fn dsym_option_controls_descriptor_edit_and_symbol_copy() {
        let fixture = Fixture::new(vec![foo_target(Platform::Ios)]);
        let descriptor = fixture.context.project_path().join("project.pbxproj");
        let before = std::fs::read(&descriptor).unwrap();
        let runner = FakeXcode::new().with_module("Foo", "Foo");
        let options = HookOptions {
            dsym: false,
            configuration: "Release".into(),
            flags: vec!["GCC_OPTIMIZATION_LEVEL=s".into()],
            ..Default::default()
        };

        let report = PostInstallHook::new(&runner, options)
            .run(&fixture.context)
            .await
            .unwrap();

        assert!(report.symbols.is_empty());
        assert!(!fixture.symbols().exists());
        assert_eq!(std::fs::read(&descriptor).unwrap(), before);

        let builds = runner.builds();
        let device = &builds[0];
        assert!(device.get_args().contains(&"Release".to_string()));
        assert!(device.get_args().contains(&"GCC_OPTIMIZATION_LEVEL=s".to_string()));
    }

    #[tokio::test]
    async fn missing_configuration_is_reported_before_building() {
        let fixture = Fixture::new(vec![foo_target(Platform::Ios)]);
        let runner = FakeXcode::new().with_module("Foo", "Foo");
        let options = HookOptions {
            configuration: "Beta".into(),
            ..Default::default()
        };

        let err = PostInstallHook::new(&runner, options)
            .run(&fixture.context)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingConfiguration { .. }));
        assert!(runner.builds().is_empty());
        assert!(!fixture.build_dir().exists());
    }

    #[tokio::test]
    async fn no_buildable_targets_means_no_build_directory() {
        let fixture = Fixture::new(Vec::new());
        let runner = FakeXcode::new();
        let workspace = Workspace::new(
            fixture.build_dir(),
            fixture.destination(),
            fixture.symbols(),
        );

        let err = PostInstallHook::new(&runner, HookOptions::default())
            .with_workspace(workspace)
            .run(&fixture.context)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingBuildDirectory(ref path) if *path == fixture.build_dir()
        ));
    }

    #[test]
    fn pluralizes_counts() {
        assert_eq!(plural(1, "framework"), "1 framework");
        assert_eq!(plural(0, "framework"), "0 frameworks");
        assert_eq!(plural(3, "framework"), "3 frameworks");
    }
}
