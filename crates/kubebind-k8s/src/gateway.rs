//! External command execution
//!
//! Every CLI call goes through [`CommandRunner`], which buffers the whole
//! output and reports non-zero exits as data rather than errors.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use kubebind_types::{BindError, Result, ShellResult};

/// External tools kubebind drives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tool {
    Kubectl,
    Svcat,
    Kind,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kubectl => "kubectl",
            Self::Svcat => "svcat",
            Self::Kind => "kind",
        }
    }
}

/// Binary location for each tool
#[derive(Clone, Debug)]
pub struct ToolPaths {
    pub kubectl: String,
    pub svcat: String,
    pub kind: String,
}

impl ToolPaths {
    pub fn program(&self, tool: Tool) -> &str {
        match tool {
            Tool::Kubectl => &self.kubectl,
            Tool::Svcat => &self.svcat,
            Tool::Kind => &self.kind,
        }
    }
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            kubectl: Tool::Kubectl.name().to_string(),
            svcat: Tool::Svcat.name().to_string(),
            kind: Tool::Kind.name().to_string(),
        }
    }
}

/// Runs external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `tool` with `args` to completion.
    ///
    /// A non-zero exit is returned as a `ShellResult`; only a failure to
    /// start the process is an error.
    async fn invoke(&self, tool: Tool, args: &[String]) -> Result<ShellResult>;

    /// Run `tool` but give up after `timeout` or when `cancel` fires.
    ///
    /// The pending invocation is dropped when it loses the race, which for
    /// [`ShellRunner`] kills the child process.
    async fn invoke_with_timeout(
        &self,
        tool: Tool,
        args: &[String],
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<ShellResult> {
        tokio::select! {
            result = self.invoke(tool, args) => result,
            _ = tokio::time::sleep(timeout) => {
                debug!(tool = tool.name(), ?timeout, "command abandoned after timeout");
                Err(BindError::TimedOut {
                    program: tool.name().to_string(),
                    secs: timeout.as_secs(),
                })
            }
            _ = cancel.cancelled() => Err(BindError::Cancelled),
        }
    }
}

/// Runs tools as child processes
#[derive(Clone, Debug, Default)]
pub struct ShellRunner {
    paths: ToolPaths,
}

impl ShellRunner {
    pub fn new(paths: ToolPaths) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn invoke(&self, tool: Tool, args: &[String]) -> Result<ShellResult> {
        let program = self.paths.program(tool);
        debug!(program, ?args, "invoking");

        let output = tokio::process::Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| BindError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let result = ShellResult {
            // Killed by a signal: no exit code
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(program, code = result.code, "finished");

        Ok(result)
    }
}

/// Build an owned argument vector from string slices
pub(crate) fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
