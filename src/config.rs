//! kubebind configuration
//!
//! Read from `~/.config/kubebind/config.toml` unless `--config` names a
//! file. Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use kubebind_chart::DEFAULT_SEARCH_LIMIT;
use kubebind_k8s::ToolPaths;

const DEFAULT_VERSION_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path or name of the kubectl binary
    pub kubectl: String,
    pub svcat: String,
    pub kind: String,

    /// How long to wait for `kubectl version` per context
    pub version_timeout_secs: u64,

    /// Service instances are cached until invalidated unless this is set
    pub instance_cache_ttl_secs: Option<u64>,

    /// Maximum number of chart candidates collected from the workspace
    pub chart_search_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        let tools = ToolPaths::default();
        Self {
            kubectl: tools.kubectl,
            svcat: tools.svcat,
            kind: tools.kind,
            version_timeout_secs: DEFAULT_VERSION_TIMEOUT_SECS,
            instance_cache_ttl_secs: None,
            chart_search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl Config {
    /// Returns `~/.config/kubebind/config.toml` on Unix
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kubebind").join("config.toml"))
    }

    /// Load an explicit file, or the default one if it exists.
    ///
    /// A missing default file gives the defaults; a missing explicit file or
    /// a malformed one is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn tool_paths(&self) -> ToolPaths {
        ToolPaths {
            kubectl: self.kubectl.clone(),
            svcat: self.svcat.clone(),
            kind: self.kind.clone(),
        }
    }

    pub fn version_timeout(&self) -> Duration {
        Duration::from_secs(self.version_timeout_secs)
    }

    pub fn instance_cache_ttl(&self) -> Option<Duration> {
        self.instance_cache_ttl_secs.map(Duration::from_secs)
    }
}
