use thiserror::Error;

pub type Result<T, E = BindError> = std::result::Result<T, E>;

/// Failures surfaced by kubebind operations
#[derive(Debug, Error)]
pub enum BindError {
    /// No workspace, chart or values file where one was required
    #[error("{0}")]
    NotFound(String),

    /// Several charts matched and no picker was available to choose one
    #[error("Found {} charts; pass --chart to choose one: {}", .0.len(), .0.join(", "))]
    Ambiguous(Vec<String>),

    /// CLI output or manifest content could not be understood
    #[error("{0}")]
    Parse(String),

    /// The external command ran and exited non-zero
    #[error("{message}")]
    CommandFailed { message: String, stderr: String },

    /// The external command could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {secs}s")]
    TimedOut { program: String, secs: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The user dismissed a prompt; never shown as an error
    #[error("Cancelled")]
    Cancelled,
}

impl BindError {
    pub fn command_failed(message: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            message: message.into(),
            stderr: stderr.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<serde_yaml::Error> for BindError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(format!("Invalid YAML: {}", e))
    }
}

impl From<serde_json::Error> for BindError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(format!("Invalid JSON: {}", e))
    }
}
