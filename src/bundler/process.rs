//! Subprocess execution.
//!
//! Every external tool (`xcodebuild`, `xcrun simctl`, user callbacks) is run
//! through a [`CommandRunner`], so the pipeline can be exercised without a
//! toolchain installed.

use crate::bundler::{Error, Result};
use async_trait::async_trait;
use std::fmt;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// A fully described subprocess call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    stdin: Option<Vec<u8>>,
}

impl Invocation {
    /// Create a new invocation of `program`
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            ..Default::default()
        }
    }

    /// Add an argument
    pub fn arg<S: AsRef<str>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_string()));
        self
    }

    /// Set an environment variable for the child
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// Bytes written to the child's standard input before it is closed
    pub fn stdin(mut self, bytes: Vec<u8>) -> Self {
        self.stdin = Some(bytes);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_envs(&self) -> &[(String, String)] {
        &self.envs
    }

    pub fn get_stdin(&self) -> Option<&[u8]> {
        self.stdin.as_deref()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished subprocess.
#[derive(Clone, Debug, Default)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    fn status_description(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs subprocesses to completion.
///
/// Implementations block (asynchronously) until the child exits. There is no
/// timeout: a hung toolchain hangs the caller.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the invocation and capture its output, whatever its exit status.
    async fn output(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Run an invocation and turn a nonzero exit into [`Error::Toolchain`].
///
/// Standard output is logged at debug level; on failure standard error is
/// logged as a warning and carried in the error.
pub async fn execute(runner: &dyn CommandRunner, invocation: &Invocation) -> Result<CommandOutput> {
    log::debug!("$ {}", invocation);
    let output = runner.output(invocation).await?;

    for line in output.stdout_lossy().lines() {
        log::debug!("  {}", line);
    }

    if !output.success() {
        let stderr = output.stderr_lossy();
        log::warn!("{} failed: {}", invocation.program(), stderr.trim());
        return Err(Error::Toolchain {
            command: invocation.to_string(),
            status: output.status_description(),
            stderr,
        });
    }

    Ok(output)
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn output(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let mut command = Command::new(invocation.program());
        command
            .args(invocation.get_args())
            .envs(invocation.get_envs().iter().map(|(k, v)| (k, v)))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command.stdin(if invocation.get_stdin().is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ToolNotFound(invocation.program().to_string())
            } else {
                Error::GenericError(format!("Failed to execute {}: {}", invocation.program(), e))
            }
        })?;

        if let (Some(bytes), Some(mut stdin)) = (invocation.get_stdin(), child.stdin.take()) {
            stdin.write_all(bytes).await?;
            // Closing stdin signals EOF to the child
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
