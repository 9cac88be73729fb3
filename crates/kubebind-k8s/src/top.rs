//! Resource usage from `kubectl top`

use tracing::warn;

use kubebind_types::{BindError, ResourceUsage, Result, UsageTarget};

use crate::gateway::{CommandRunner, Tool, args};

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Show resource usage of a single node or pod as `FIELD: VALUE` lines
///
/// Executes: kubectl top node|pod <name>
pub async fn resource_usage<R: CommandRunner + ?Sized>(
    runner: &R,
    target: UsageTarget,
    name: &str,
) -> Result<String> {
    let result = runner
        .invoke(Tool::Kubectl, &args(["top", target.as_str(), name]))
        .await?;

    if !result.success() {
        return Err(BindError::command_failed(
            format!("Could not get resource usage for {} {}", target.as_str(), name),
            result.stderr,
        ));
    }

    let usage = parse_usage(&result.stdout)?;
    Ok(format_usage(&usage))
}

/// Pair the header row with the first value row
pub fn parse_usage(output: &str) -> Result<ResourceUsage> {
    let mut lines = output.lines().filter(|l| !l.trim().is_empty());

    let (Some(header), Some(values)) = (lines.next(), lines.next()) else {
        return Err(BindError::Parse(
            "Expected a header row and a value row from kubectl top".to_string(),
        ));
    };

    let headers: Vec<&str> = header.split_whitespace().collect();
    let values: Vec<&str> = values.split_whitespace().collect();
    if headers.len() != values.len() {
        warn!(
            headers = headers.len(),
            values = values.len(),
            "kubectl top column count mismatch"
        );
    }

    Ok(ResourceUsage {
        fields: headers
            .iter()
            .zip(values.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect(),
    })
}

pub fn format_usage(usage: &ResourceUsage) -> String {
    usage
        .fields
        .iter()
        .map(|(field, value)| format!("{}: {}", field, value))
        .collect::<Vec<_>>()
        .join(LINE_ENDING)
}
