//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, and merges the
//! arguments with the optional TOML options file into [`HookOptions`].

use crate::bundler::HookOptions;
use crate::error::Result;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

/// Prebuild installed pods into xcframeworks
#[derive(Parser, Debug)]
#[command(
    name = "pods-rome",
    version,
    about = "Prebuild installed pods into xcframeworks",
    long_about = "Post-install hook that builds every pod for iOS device, Mac Catalyst and the iOS simulator,
merges each module into an xcframework, and copies the results together with vendored
libraries, frameworks and resources into BinaryPods/ next to the project.

The install context is read from a JSON snapshot written by the package manager shim.

Usage:
  pods-rome --context Pods/.pods-rome.json
  pods-rome --context ctx.json --configuration Release --flag GCC_OPTIMIZATION_LEVEL=s
  pods-rome --context ctx.json --options pods-rome.toml --no-dsym

Exit code 0 = every module was built and collected."
)]
pub struct Args {
    /// Install context snapshot (JSON)
    #[arg(short = 'c', long, value_name = "FILE", env = "PODS_ROME_CONTEXT")]
    pub context: PathBuf,

    /// Hook options file (TOML)
    ///
    /// Keys: dsym, configuration, flags, pre_compile, post_compile.
    /// Command line arguments override values from this file.
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Build configuration [default: Debug]
    #[arg(long, value_name = "NAME", env = "PODS_ROME_CONFIGURATION")]
    pub configuration: Option<String>,

    /// Skip debug symbol generation and collection
    #[arg(long)]
    pub no_dsym: bool,

    /// Extra build setting or flag for every xcodebuild build (repeatable)
    #[arg(long = "flag", value_name = "FLAG", allow_hyphen_values = true)]
    pub flags: Vec<String>,

    /// Shell command run before building
    #[arg(long, value_name = "CMD")]
    pub pre_compile: Option<String>,

    /// Shell command run after artifacts are collected
    #[arg(long, value_name = "CMD")]
    pub post_compile: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.context.is_file() {
            return Err(format!(
                "Context file not found: {}",
                self.context.display()
            ));
        }

        if let Some(options) = &self.options
            && !options.is_file()
        {
            return Err(format!("Options file not found: {}", options.display()));
        }

        if let Some(configuration) = &self.configuration
            && configuration.trim().is_empty()
        {
            return Err("Configuration cannot be empty".to_string());
        }

        Ok(())
    }

    /// Options file values overridden by command line arguments.
    pub fn hook_options(&self) -> Result<HookOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let source = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read options file {}", path.display()))?;
                HookOptions::from_toml_str(&source)?
            }
            None => HookOptions::default(),
        };

        if let Some(configuration) = &self.configuration {
            options.configuration = configuration.clone();
        }
        if self.no_dsym {
            options.dsym = false;
        }
        options.flags.extend(self.flags.iter().cloned());
        if self.pre_compile.is_some() {
            options.pre_compile = self.pre_compile.clone();
        }
        if self.post_compile.is_some() {
            options.post_compile = self.post_compile.clone();
        }

        Ok(options)
    }
}
