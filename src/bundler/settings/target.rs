//! Umbrella targets and the package specs they bundle.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Platform an umbrella target is installed for.
///
/// Any identifier is accepted when a context snapshot is read; only
/// [`Platform::Ios`] can be built; see [`BuildTarget::ensure_supported`].
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Ios,
    Other(String),
}

impl From<String> for Platform {
    fn from(name: String) -> Self {
        if name == "ios" {
            Platform::Ios
        } else {
            Platform::Other(name)
        }
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Ios => f.write_str("ios"),
            Platform::Other(name) => f.write_str(name),
        }
    }
}

/// One installed package (or subspec).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// Full spec name, e.g. `Firebase/Core`
    pub name: String,

    /// Name of the root spec, e.g. `Firebase`
    pub root_name: String,

    /// Module name of the root spec, used for framework file names.
    ///
    /// Default: derived from `root_name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,

    /// Prebuilt static or dynamic libraries, as patterns relative to the pod directory.
    #[serde(default)]
    pub vendored_libraries: Vec<String>,

    /// Prebuilt frameworks, as patterns relative to the pod directory.
    #[serde(default)]
    pub vendored_frameworks: Vec<String>,

    /// Resource files, as patterns relative to the pod directory.
    #[serde(default)]
    pub resources: Vec<String>,
}

impl PackageSpec {
    /// Module name, falling back to a C99 identifier derived from the root name.
    pub fn module_name(&self) -> String {
        match &self.module_name {
            Some(name) => name.clone(),
            None => c99_identifier(&self.root_name),
        }
    }
}

/// Replace every character that is not valid in a C99 identifier with `_`,
/// prefixing `_` when the name starts with a digit.
fn c99_identifier(name: &str) -> String {
    let mut identifier: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if identifier.starts_with(|c: char| c.is_ascii_digit()) {
        identifier.insert(0, '_');
    }
    identifier
}

/// An umbrella target: one scheme that builds a set of packages for a platform.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BuildTarget {
    /// Platform the target is installed for
    pub platform: Platform,

    /// Scheme label, e.g. `Pods-App`
    pub label: String,

    /// Minimum OS version, e.g. `13.0`
    pub deployment_target: String,

    /// Packages bundled by this target, in install order
    #[serde(default)]
    pub specs: Vec<PackageSpec>,
}

impl BuildTarget {
    /// Fail with [`Error::UnsupportedPlatform`](crate::bundler::Error::UnsupportedPlatform)
    /// unless the target can be built.
    pub fn ensure_supported(&self) -> crate::bundler::Result<()> {
        match &self.platform {
            Platform::Ios => Ok(()),
            Platform::Other(name) => Err(crate::bundler::Error::UnsupportedPlatform {
                target: self.label.clone(),
                platform: name.clone(),
            }),
        }
    }

    /// Distinct `(root_name, module_name)` pairs, in first-seen order.
    ///
    /// Subspecs of one pod share a root and produce a single framework.
    pub fn unique_modules(&self) -> Vec<(String, String)> {
        let mut seen = HashSet::new();
        self.specs
            .iter()
            .map(|spec| (spec.root_name.clone(), spec.module_name()))
            .filter(|pair| seen.insert(pair.clone()))
            .collect()
    }
}
