//! SDK identifiers and the per-platform slices that make up an xcframework.

use std::fmt;
use std::path::{Path, PathBuf};

/// SDK passed to `xcodebuild -sdk`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Sdk {
    /// iOS device
    IphoneOs,
    /// iOS simulator
    IphoneSimulator,
    /// macOS, used for Mac Catalyst builds
    MacOsx,
    /// tvOS simulator
    AppleTvSimulator,
    /// watchOS simulator
    WatchSimulator,
}

impl Sdk {
    /// Identifier understood by `xcodebuild -sdk`.
    pub fn identifier(self) -> &'static str {
        match self {
            Sdk::IphoneOs => "iphoneos",
            Sdk::IphoneSimulator => "iphonesimulator",
            Sdk::MacOsx => "macosx",
            Sdk::AppleTvSimulator => "appletvsimulator",
            Sdk::WatchSimulator => "watchsimulator",
        }
    }

    /// Simulator platform family for simulator SDKs, `None` for device and mac SDKs.
    ///
    /// The returned name matches the OS component of CoreSimulator runtime
    /// identifiers (`com.apple.CoreSimulator.SimRuntime.iOS-17-0`).
    pub fn simulator_platform(self) -> Option<&'static str> {
        match self {
            Sdk::IphoneSimulator => Some("iOS"),
            Sdk::AppleTvSimulator => Some("tvOS"),
            Sdk::WatchSimulator => Some("watchOS"),
            _ => None,
        }
    }
}

impl fmt::Display for Sdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// One platform slice of a merged xcframework.
///
/// [`Slice::ALL`] is the order in which slices are built *and* the order of
/// `-framework` flags handed to the merge tool.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Slice {
    Device,
    Catalyst,
    Simulator,
}

impl Slice {
    pub const ALL: [Slice; 3] = [Slice::Device, Slice::Catalyst, Slice::Simulator];

    /// SDK the slice is built with.
    pub fn sdk(self) -> Sdk {
        match self {
            Slice::Device => Sdk::IphoneOs,
            Slice::Catalyst => Sdk::MacOsx,
            Slice::Simulator => Sdk::IphoneSimulator,
        }
    }

    /// Suffix of the `<Configuration>-<suffix>` products directory.
    pub fn products_suffix(self) -> &'static str {
        match self {
            Slice::Device => "iphoneos",
            Slice::Catalyst => "maccatalyst",
            Slice::Simulator => "iphonesimulator",
        }
    }

    /// Flags the slice is always built with, before user flags.
    pub fn build_flags(self) -> Vec<String> {
        let flags: &[&str] = match self {
            Slice::Device | Slice::Simulator => {
                &["SKIP_INSTALL=NO", "BUILD_LIBRARY_FOR_DISTRIBUTION=YES"]
            }
            Slice::Catalyst => &[
                "-destination",
                "platform=macOS,arch=arm64",
                "SKIP_INSTALL=NO",
                "SUPPORTS_MACCATALYST=YES",
                "BUILD_LIBRARY_FOR_DISTRIBUTION=YES",
            ],
        };
        flags.iter().map(|f| f.to_string()).collect()
    }

    /// Human readable name used in progress messages.
    pub fn description(self) -> &'static str {
        match self {
            Slice::Device => "ios device",
            Slice::Catalyst => "mac",
            Slice::Simulator => "ios simulator",
        }
    }

    /// `<build_dir>/<Configuration>-<suffix>/<root_name>/<module_name>.framework`
    pub fn framework_path(
        self,
        build_dir: &Path,
        configuration: &str,
        root_name: &str,
        module_name: &str,
    ) -> PathBuf {
        build_dir
            .join(format!("{}-{}", configuration, self.products_suffix()))
            .join(root_name)
            .join(format!("{}.framework", module_name))
    }
}
