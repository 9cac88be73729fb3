//! API server version lookup
//!
//! `kubectl version` can block on an interactive auth prompt, and
//! `--request-timeout` does not cover that, so the call is raced against a
//! timer and the child is killed if the timer wins.

use std::time::Duration;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use kubebind_types::ServerVersion;

use crate::gateway::{CommandRunner, Tool};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionInfo {
    server_version: Option<VersionFields>,
}

#[derive(Deserialize)]
struct VersionFields {
    major: Option<String>,
    minor: Option<String>,
}

/// Server version of a kubeconfig context, or `None` if it can't be had in time
///
/// Executes: kubectl version --output json --context <context> --request-timeout=<secs>s
pub async fn server_version<R: CommandRunner + ?Sized>(
    runner: &R,
    context: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Option<ServerVersion> {
    let args = vec![
        "version".to_string(),
        "--output".to_string(),
        "json".to_string(),
        "--context".to_string(),
        context.to_string(),
        format!("--request-timeout={}s", timeout.as_secs().max(1)),
    ];

    let result = match runner
        .invoke_with_timeout(Tool::Kubectl, &args, timeout, cancel)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            debug!(context, error = %e, "no server version");
            return None;
        }
    };

    if !result.success() {
        debug!(context, code = result.code, "kubectl version failed");
        return None;
    }

    parse_server_version(&result.stdout)
}

/// Extract `serverVersion.major` and `.minor`; both must be non-empty
pub fn parse_server_version(output: &str) -> Option<ServerVersion> {
    let info: VersionInfo = match serde_json::from_str(output) {
        Ok(info) => info,
        Err(e) => {
            debug!(error = %e, "unparseable kubectl version output");
            return None;
        }
    };

    let fields = info.server_version?;
    let major = fields.major.filter(|s| !s.is_empty())?;
    let minor = fields.minor.filter(|s| !s.is_empty())?;

    Some(ServerVersion { major, minor })
}
