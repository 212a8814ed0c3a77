//! Command line interface for the post-install hook.
//!
//! This module parses arguments, loads the install context, and runs
//! [`PostInstallHook`] against the real toolchain.

mod args;

pub use args::Args;

use crate::bundler::{builder::ensure_toolchain, process::SystemRunner};
use crate::context::InstallContext;
use crate::error::{CliError, Result};
use crate::hook::PostInstallHook;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    execute(Args::parse_args()).await
}

/// Run the hook for already parsed arguments.
///
/// The context is validated before the toolchain is looked up, so an
/// unsupported platform is reported even on hosts without Xcode.
pub async fn execute(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let options = args.hook_options()?;
    if options.configuration.trim().is_empty() {
        return Err(CliError::InvalidArguments {
            reason: "Configuration cannot be empty".to_string(),
        }
        .into());
    }

    let context = InstallContext::load(&args.context)?;
    context.validate_platforms()?;
    ensure_toolchain()?;

    let runner = SystemRunner;
    let report = PostInstallHook::new(&runner, options).run(&context).await?;

    for module in &report.build.skipped {
        log::warn!("{} was not merged: a platform slice was not built", module);
    }
    log::info!(
        "✓ {} xcframework(s) built, {} item(s) collected, {} symbol bundle(s) copied",
        report.build.merged.len() + report.build.already_present.len(),
        report.copied.len(),
        report.symbols.len()
    );

    Ok(0)
}
