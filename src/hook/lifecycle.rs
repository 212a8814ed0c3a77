//! User callbacks around the build.
//!
//! A [`LifecycleHook`] runs at two named points of a hook run: before
//! anything is built ([`Phase::PreCompile`]) and after artifacts have been
//! collected ([`Phase::PostCompile`]). Each call is awaited; a failing
//! callback aborts the run.

use crate::bundler::{
    Error, Result,
    process::{CommandRunner, Invocation},
};
use crate::context::InstallContext;
use async_trait::async_trait;
use std::fmt;

/// Environment variable carrying the phase name to command callbacks.
pub const PHASE_ENV: &str = "PODS_ROME_PHASE";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Phase {
    PreCompile,
    PostCompile,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::PreCompile => "pre_compile",
            Phase::PostCompile => "post_compile",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension point invoked at each [`Phase`].
#[async_trait]
pub trait LifecycleHook: Send + Sync {
    async fn call(
        &self,
        phase: Phase,
        context: &InstallContext,
        runner: &dyn CommandRunner,
    ) -> Result<()>;
}

/// Does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHook;

#[async_trait]
impl LifecycleHook for NoopHook {
    async fn call(&self, _: Phase, _: &InstallContext, _: &dyn CommandRunner) -> Result<()> {
        Ok(())
    }
}

/// Runs a shell command through `sh -c`.
///
/// The command receives the install context snapshot as JSON on stdin and
/// the phase name in `PODS_ROME_PHASE`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandHook {
    command: String,
}

impl CommandHook {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// [`CommandHook`] when a command is configured, [`NoopHook`] otherwise.
    pub fn boxed(command: Option<&str>) -> Box<dyn LifecycleHook> {
        match command {
            Some(command) => Box::new(CommandHook::new(command)),
            None => Box::new(NoopHook),
        }
    }
}

#[async_trait]
impl LifecycleHook for CommandHook {
    async fn call(
        &self,
        phase: Phase,
        context: &InstallContext,
        runner: &dyn CommandRunner,
    ) -> Result<()> {
        log::info!("Running {} callback: {}", phase, self.command);

        let invocation = Invocation::new("sh")
            .args(["-c", self.command.as_str()])
            .env(PHASE_ENV, phase.as_str())
            .stdin(context.to_json()?);

        let output = runner.output(&invocation).await.map_err(|e| Error::Callback {
            phase: phase.to_string(),
            command: self.command.clone(),
            reason: e.to_string(),
        })?;

        for line in output.stdout_lossy().lines() {
            log::info!("  {}", line);
        }

        if !output.success() {
            let reason = match output.code {
                Some(code) => format!("exit code {}: {}", code, output.stderr_lossy().trim()),
                None => "terminated by signal".to_string(),
            };
            return Err(Error::Callback {
                phase: phase.to_string(),
                command: self.command.clone(),
                reason,
            });
        }
        Ok(())
    }
}
