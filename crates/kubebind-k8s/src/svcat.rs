//! Service catalog (`svcat`) commands

use tracing::{debug, warn};

use kubebind_types::{BindError, Result, ServiceInstance};

use crate::gateway::{CommandRunner, Tool, args};

/// Header and separator rows printed before the instance table
const HEADER_LINES: usize = 2;

/// Substring svcat prints when a binding for the instance is already present
const ALREADY_EXISTS: &str = "already exists";

/// List service instances in the current context
///
/// Executes: svcat get instances
pub async fn get_instances<R: CommandRunner + ?Sized>(runner: &R) -> Result<Vec<ServiceInstance>> {
    let result = runner
        .invoke(Tool::Svcat, &args(["get", "instances"]))
        .await
        .map_err(|e| match e {
            BindError::Spawn { .. } => BindError::command_failed(
                "Error retrieving Service Instances",
                e.to_string(),
            ),
            other => other,
        })?;

    if !result.success() {
        return Err(BindError::command_failed(
            "Error retrieving Service Instances",
            result.stderr,
        ));
    }

    Ok(parse_instances(&result.stdout))
}

/// Parse the `svcat get instances` table
///
/// The first two lines are headers. Every remaining non-blank line yields one
/// instance with whitespace-separated NAME NAMESPACE CLASS PLAN STATUS.
/// Missing trailing columns come back as empty strings.
pub fn parse_instances(output: &str) -> Vec<ServiceInstance> {
    output
        .lines()
        .skip(HEADER_LINES)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.split_whitespace().map(str::to_string);
            let mut next = || fields.next().unwrap_or_default();
            let instance = ServiceInstance::new(next(), next(), next(), next(), next());
            if instance.status.is_empty() {
                warn!(line, "service instance row has fewer than five columns");
            }
            instance
        })
        .collect()
}

/// Bind an instance, reusing an existing binding of the same name
///
/// Executes: svcat bind <name>
///
/// Returns the binding name, which is always the instance name.
pub async fn bind_instance<R: CommandRunner + ?Sized>(runner: &R, name: &str) -> Result<String> {
    let result = runner
        .invoke(Tool::Svcat, &args(["bind", name]))
        .await
        .map_err(|e| {
            BindError::command_failed(
                format!("Error binding to External Service \"{}\"", name),
                e.to_string(),
            )
        })?;

    if result.success() {
        return Ok(name.to_string());
    }

    if result.stderr.contains(ALREADY_EXISTS) {
        debug!(name, "binding already exists, reusing it");
        return Ok(name.to_string());
    }

    Err(BindError::command_failed(
        format!("Could not bind to External Service \"{}\"", name),
        result.stderr,
    ))
}
