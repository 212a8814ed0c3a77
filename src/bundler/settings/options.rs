//! User options accepted by the post-install hook.

use serde::Deserialize;

/// Options controlling one hook run.
///
/// # Configuration
///
/// Read from a TOML file passed with `--options`:
///
/// ```toml
/// dsym = true
/// configuration = "Release"
/// flags = ["GCC_PREPROCESSOR_DEFINITIONS=PREBUILT=1"]
/// pre_compile = "./scripts/patch-pods.sh"
/// post_compile = "./scripts/notify.sh"
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HookOptions {
    /// Capture and copy debug symbol bundles.
    ///
    /// Default: true
    pub dsym: bool,

    /// Build configuration name.
    ///
    /// Default: "Debug"
    pub configuration: String,

    /// Extra build settings or flags passed to every `xcodebuild` build.
    ///
    /// Default: Empty
    pub flags: Vec<String>,

    /// Shell command run before anything is built.
    ///
    /// Receives the install context snapshot as JSON on stdin.
    pub pre_compile: Option<String>,

    /// Shell command run after artifacts have been collected.
    ///
    /// Receives the install context snapshot as JSON on stdin.
    pub post_compile: Option<String>,
}

impl Default for HookOptions {
    fn default() -> Self {
        Self {
            dsym: true,
            configuration: "Debug".to_string(),
            flags: Vec::new(),
            pre_compile: None,
            post_compile: None,
        }
    }
}

impl HookOptions {
    /// Parse options from TOML; missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Flags handed to the toolchain: `SKIP_INSTALL=NO` followed by user flags.
    ///
    /// `SKIP_INSTALL=NO` makes the built frameworks land in the products
    /// directory instead of being skipped as installable archives.
    pub fn toolchain_flags(&self) -> Vec<String> {
        let mut flags = vec!["SKIP_INSTALL=NO".to_string()];
        flags.extend(self.flags.iter().cloned());
        flags
    }
}
