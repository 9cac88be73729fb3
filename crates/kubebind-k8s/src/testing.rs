//! Scripted command runner for tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use kubebind_types::{BindError, Result, ShellResult};

use crate::gateway::{CommandRunner, Tool};

/// Replays canned results keyed by command line (`"svcat bind mysql"`)
/// and records every invocation.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    responses: Arc<Mutex<HashMap<String, ShellResult>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a result for a command line
    pub fn on(self, command_line: &str, result: ShellResult) -> Self {
        self.responses.lock().insert(command_line.to_string(), result);
        self
    }

    /// Script a successful command with the given stdout
    pub fn ok(self, command_line: &str, stdout: &str) -> Self {
        self.on(command_line, ShellResult::new(0, stdout, ""))
    }

    /// All command lines invoked so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of invocations whose command line starts with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn invoke(&self, tool: Tool, args: &[String]) -> Result<ShellResult> {
        let mut line = tool.name().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().push(line.clone());

        self.responses
            .lock()
            .get(&line)
            .cloned()
            .ok_or_else(|| BindError::Spawn {
                program: tool.name().to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("unscripted command: {}", line),
                ),
            })
    }
}
