//! Configuration and input types for a hook run.
//!
//! - [`HookOptions`]: user options (dsym, configuration, flags, callbacks)
//! - [`BuildTarget`] / [`PackageSpec`]: umbrella targets from the install context
//! - [`Sdk`] / [`Slice`]: SDK identifiers and the slices merged into an xcframework

mod options;
mod sdk;
mod target;

pub use options::HookOptions;
pub use sdk::{Sdk, Slice};
pub use target::{BuildTarget, PackageSpec, Platform};
