//! Simulator selection through `xcrun simctl`.
//!
//! Simulator builds need an explicit `-destination`; the pipeline always picks
//! a simulator running the oldest runtime that still satisfies the deployment
//! target, so the produced slice links against the lowest supported SDK.

use crate::bundler::{
    Error, Result,
    process::{CommandRunner, Invocation, execute},
};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashMap;

const RUNTIME_PREFIX: &str = "com.apple.CoreSimulator.SimRuntime.";

/// Dotted OS version compared component-wise, missing components as zero.
#[derive(Clone, Debug, Eq)]
pub struct OsVersion(Vec<u32>);

impl OsVersion {
    /// Parse `17.0`, `17-0` or `16.4.1`; `None` on a non-numeric component.
    pub fn parse(text: &str) -> Option<Self> {
        text.split(['.', '-'])
            .map(|part| part.parse::<u32>().ok())
            .collect::<Option<Vec<_>>>()
            .filter(|parts| !parts.is_empty())
            .map(OsVersion)
    }

    fn component(&self, index: usize) -> u32 {
        self.0.get(index).copied().unwrap_or(0)
    }
}

impl PartialEq for OsVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for OsVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OsVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

#[derive(Debug, Deserialize)]
struct DeviceList {
    devices: HashMap<String, Vec<Device>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Device {
    udid: String,
    name: String,
    #[serde(default = "available_by_default")]
    is_available: bool,
}

fn available_by_default() -> bool {
    true
}

/// A simulator that can serve as a build destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Simulator {
    pub udid: String,
    pub name: String,
    pub os: String,
    pub version: OsVersion,
}

/// Split `com.apple.CoreSimulator.SimRuntime.iOS-17-0` into (`iOS`, 17.0).
fn parse_runtime(identifier: &str) -> Option<(String, OsVersion)> {
    let rest = identifier.strip_prefix(RUNTIME_PREFIX)?;
    let (os, version) = rest.split_once('-')?;
    Some((os.to_string(), OsVersion::parse(version)?))
}

/// Parse `simctl list devices available -j` output into usable simulators.
pub fn parse_simulators(json: &str) -> Result<Vec<Simulator>> {
    let list: DeviceList = serde_json::from_str(json)?;
    let mut simulators = Vec::new();
    for (runtime, devices) in list.devices {
        let Some((os, version)) = parse_runtime(&runtime) else {
            log::debug!("Ignoring unrecognised simulator runtime {}", runtime);
            continue;
        };
        simulators.extend(devices.into_iter().filter(|d| d.is_available).map(|d| {
            Simulator {
                udid: d.udid,
                name: d.name,
                os: os.clone(),
                version: version.clone(),
            }
        }));
    }
    // HashMap order is arbitrary; sort for a stable choice between equal runtimes
    simulators.sort_by(|a, b| a.version.cmp(&b.version).then_with(|| a.name.cmp(&b.name)));
    Ok(simulators)
}

/// Oldest simulator for `platform` whose runtime is at least `deployment_target`.
pub fn select_oldest<'a>(
    simulators: &'a [Simulator],
    platform: &str,
    deployment_target: &str,
) -> Option<&'a Simulator> {
    let minimum = OsVersion::parse(deployment_target)?;
    simulators
        .iter()
        .filter(|s| s.os == platform && s.version >= minimum)
        .min_by(|a, b| a.version.cmp(&b.version))
}

/// Queries the simulator inventory through `xcrun simctl`.
pub struct SimControl<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> SimControl<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// `-destination id=<udid>` arguments for the oldest eligible simulator.
    pub async fn oldest_destination(
        &self,
        platform: &str,
        deployment_target: &str,
    ) -> Result<Vec<String>> {
        let invocation =
            Invocation::new("xcrun").args(["simctl", "list", "devices", "available", "-j"]);
        let output = execute(self.runner, &invocation).await?;
        let simulators = parse_simulators(&output.stdout_lossy())?;

        let simulator = select_oldest(&simulators, platform, deployment_target).ok_or_else(|| {
            Error::NoSimulator {
                platform: platform.to_string(),
                deployment_target: deployment_target.to_string(),
            }
        })?;

        log::debug!(
            "Using {} ({} {}) as simulator destination",
            simulator.name,
            simulator.os,
            deployment_target
        );
        Ok(vec!["-destination".to_string(), format!("id={}", simulator.udid)])
    }
}
