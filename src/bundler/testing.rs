//! Fakes for exercising the pipeline without a toolchain.

use crate::bundler::{
    Result, Slice,
    process::{CommandOutput, CommandRunner, Invocation},
};
use async_trait::async_trait;
use plist::{Dictionary, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

type Responder = Box<dyn Fn(&Invocation) -> CommandOutput + Send + Sync>;

/// Runner answering every invocation through a closure and recording it.
pub struct ScriptedRunner {
    respond: Responder,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new(respond: impl Fn(&Invocation) -> CommandOutput + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every invocation succeeds with empty output.
    pub fn success() -> Self {
        Self::new(|_| ok(Vec::new()))
    }

    /// Every invocation succeeds printing `stdout`.
    pub fn stdout(stdout: String) -> Self {
        Self::new(move |_| ok(stdout.clone().into_bytes()))
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn output(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok((self.respond)(invocation))
    }
}

fn ok(stdout: Vec<u8>) -> CommandOutput {
    CommandOutput {
        code: Some(0),
        stdout,
        stderr: Vec::new(),
    }
}

/// `simctl list devices available -j` output.
///
/// Each entry is (runtime suffix such as `iOS-17-0`, udid, name, available).
pub fn simctl_json(devices: &[(&str, &str, &str, bool)]) -> String {
    let mut runtimes: BTreeMap<String, Vec<serde_json::Value>> = BTreeMap::new();
    for (runtime, udid, name, available) in devices {
        runtimes
            .entry(format!("com.apple.CoreSimulator.SimRuntime.{}", runtime))
            .or_default()
            .push(serde_json::json!({
                "udid": udid,
                "name": name,
                "isAvailable": available,
                "state": "Shutdown",
            }));
    }
    serde_json::json!({ "devices": runtimes }).to_string()
}

/// Simulates `xcodebuild` and `xcrun simctl` on the real filesystem.
///
/// Builds create `<module>.framework` (and a `.dSYM` next to it for device and
/// simulator SDKs) under the derived-data directory for every configured
/// module. `-create-xcframework` creates its `-output` directory. Anything
/// else succeeds silently.
#[derive(Default)]
pub struct FakeXcode {
    modules: Vec<(String, String)>,
    missing: Vec<Slice>,
    failing_sdk: Option<String>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeXcode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce `<module>.framework` under `<root>` on every build.
    pub fn with_module(mut self, root_name: &str, module_name: &str) -> Self {
        self.modules.push((root_name.to_string(), module_name.to_string()));
        self
    }

    /// Builds for this slice succeed without producing frameworks.
    pub fn without_slice(mut self, slice: Slice) -> Self {
        self.missing.push(slice);
        self
    }

    /// Builds for this SDK exit with status 65.
    pub fn failing_sdk(mut self, sdk: &str) -> Self {
        self.failing_sdk = Some(sdk.to_string());
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// `xcodebuild` scheme builds, in call order.
    pub fn builds(&self) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|inv| inv.program() == "xcodebuild" && value_of(inv, "-sdk").is_some())
            .collect()
    }

    /// `xcodebuild -create-xcframework` calls, in call order.
    pub fn merges(&self) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|inv| inv.get_args().first().map(String::as_str) == Some("-create-xcframework"))
            .collect()
    }

    fn build(&self, invocation: &Invocation) -> CommandOutput {
        let sdk = value_of(invocation, "-sdk").unwrap_or_default();
        if self.failing_sdk.as_deref() == Some(sdk.as_str()) {
            return CommandOutput {
                code: Some(65),
                stdout: Vec::new(),
                stderr: b"** BUILD FAILED **".to_vec(),
            };
        }

        let slice = Slice::ALL.into_iter().find(|s| s.sdk().identifier() == sdk);
        let (Some(slice), Some(derived), Some(configuration)) = (
            slice,
            value_of(invocation, "-derivedDataPath"),
            value_of(invocation, "-configuration"),
        ) else {
            return ok(Vec::new());
        };
        if self.missing.contains(&slice) {
            return ok(Vec::new());
        }

        for (root, module) in &self.modules {
            let framework = slice.framework_path(Path::new(&derived), &configuration, root, module);
            std::fs::create_dir_all(&framework).unwrap();
            std::fs::write(framework.join(module), sdk.as_bytes()).unwrap();
            if slice != Slice::Catalyst {
                let dsym = framework.with_file_name(format!("{}.framework.dSYM", module));
                std::fs::create_dir_all(dsym.join("Contents/Resources/DWARF")).unwrap();
            }
        }
        ok(Vec::new())
    }
}

#[async_trait]
impl CommandRunner for FakeXcode {
    async fn output(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(invocation.clone());

        let merging =
            invocation.get_args().first().map(String::as_str) == Some("-create-xcframework");
        let output = match invocation.program() {
            "xcrun" => ok(simctl_json(&[("iOS-17-0", "FAKE-SIM", "iPhone 15", true)]).into_bytes()),
            "xcodebuild" if merging => {
                if let Some(output) = value_of(invocation, "-output") {
                    std::fs::create_dir_all(&output).unwrap();
                    std::fs::write(Path::new(&output).join("Info.plist"), "merged").unwrap();
                }
                ok(Vec::new())
            }
            "xcodebuild" => self.build(invocation),
            _ => ok(Vec::new()),
        };
        Ok(output)
    }
}

/// Value following `flag` in the invocation's arguments.
fn value_of(invocation: &Invocation, flag: &str) -> Option<String> {
    let args = invocation.get_args();
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Write a minimal `Pods.xcodeproj/project.pbxproj` (XML property list) under `dir`.
///
/// Each target gets one build configuration per name, with object id
/// `CFG-<target>-<configuration>` and `PRODUCT_NAME = <target>`.
pub fn write_project(dir: &Path, targets: &[(&str, &[&str])]) -> PathBuf {
    let project = dir.join("Pods.xcodeproj");
    std::fs::create_dir_all(&project).unwrap();

    let mut objects = Dictionary::new();
    let mut target_ids = Vec::new();
    for (name, configurations) in targets {
        let target_id = format!("TGT-{}", name);
        let list_id = format!("LIST-{}", name);
        let mut config_ids = Vec::new();

        for configuration in *configurations {
            let id = format!("CFG-{}-{}", name, configuration);
            let mut settings = Dictionary::new();
            settings.insert("PRODUCT_NAME".into(), Value::String(name.to_string()));
            let mut config = Dictionary::new();
            config.insert("isa".into(), Value::String("XCBuildConfiguration".into()));
            config.insert("name".into(), Value::String(configuration.to_string()));
            config.insert("buildSettings".into(), Value::Dictionary(settings));
            objects.insert(id.clone(), Value::Dictionary(config));
            config_ids.push(Value::String(id));
        }

        let mut list = Dictionary::new();
        list.insert("isa".into(), Value::String("XCConfigurationList".into()));
        list.insert("buildConfigurations".into(), Value::Array(config_ids));
        objects.insert(list_id.clone(), Value::Dictionary(list));

        let mut target = Dictionary::new();
        target.insert("isa".into(), Value::String("PBXNativeTarget".into()));
        target.insert("name".into(), Value::String(name.to_string()));
        target.insert("buildConfigurationList".into(), Value::String(list_id));
        objects.insert(target_id.clone(), Value::Dictionary(target));
        target_ids.push(Value::String(target_id));
    }

    let mut root_project = Dictionary::new();
    root_project.insert("isa".into(), Value::String("PBXProject".into()));
    root_project.insert("targets".into(), Value::Array(target_ids));
    objects.insert("ROOT".into(), Value::Dictionary(root_project));

    let mut root = Dictionary::new();
    root.insert("archiveVersion".into(), Value::String("1".into()));
    root.insert("objectVersion".into(), Value::String("56".into()));
    root.insert("objects".into(), Value::Dictionary(objects));
    root.insert("rootObject".into(), Value::String("ROOT".into()));

    Value::Dictionary(root)
        .to_file_xml(project.join("project.pbxproj"))
        .unwrap();
    project
}
