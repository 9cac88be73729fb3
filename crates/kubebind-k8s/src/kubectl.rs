//! kubectl resource queries

use k8s_openapi::api::core::v1::{Secret, Service};
use serde::Deserialize;

use kubebind_types::{BindError, Result, ServiceReference};

use crate::gateway::{CommandRunner, Tool, args};

/// `kubectl get svc -o json` wraps items in a generic `List`
#[derive(Deserialize)]
struct ServiceList {
    items: Vec<Service>,
}

/// Fetch Services in the current namespace
///
/// Executes: kubectl get svc -o json
pub async fn get_services<R: CommandRunner + ?Sized>(runner: &R) -> Result<Vec<ServiceReference>> {
    let result = runner
        .invoke(Tool::Kubectl, &args(["get", "svc", "-o", "json"]))
        .await?;

    if !result.success() {
        return Err(BindError::command_failed(
            "Could not list services in the current namespace",
            result.stderr,
        ));
    }

    let list: ServiceList = serde_json::from_str(&result.stdout)?;

    Ok(list
        .items
        .into_iter()
        .map(|svc| {
            ServiceReference::new(
                svc.metadata.name.unwrap_or_default(),
                svc.metadata.namespace.unwrap_or_default(),
            )
        })
        .collect())
}

/// Fetch the key names of a secret's `data`, in sorted order
///
/// Executes: kubectl get secret <name> -o json
pub async fn get_secret_keys<R: CommandRunner + ?Sized>(runner: &R, name: &str) -> Result<Vec<String>> {
    let message = format!(
        "Could not get external service secret {} from the cluster",
        name
    );

    let result = runner
        .invoke(Tool::Kubectl, &args(["get", "secret", name, "-o", "json"]))
        .await
        .map_err(|e| BindError::command_failed(message.clone(), e.to_string()))?;

    if !result.success() {
        return Err(BindError::command_failed(message, result.stderr));
    }

    let secret: Secret = serde_json::from_str(&result.stdout)
        .map_err(|e| BindError::Parse(format!("{}: {}", message, e)))?;

    let data = secret
        .data
        .ok_or_else(|| BindError::Parse(format!("{}: secret has no data", message)))?;

    Ok(data.into_keys().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;
    use kubebind_types::ShellResult;

    const SERVICES: &str = r#"{
        "apiVersion": "v1",
        "kind": "List",
        "items": [
            {"apiVersion": "v1", "kind": "Service", "metadata": {"name": "redis", "namespace": "cache"}},
            {"apiVersion": "v1", "kind": "Service", "metadata": {"name": "api", "namespace": "default"}}
        ]
    }"#;

    const SECRET: &str = r#"{
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {"name": "mysvc", "namespace": "default"},
        "data": {"username": "cm9vdA==", "host": "ZGIubG9jYWw=", "port": "MzMwNg=="}
    }"#;

    #[tokio::test]
    async fn test_get_services() {
        let runner = ScriptedRunner::new().ok("kubectl get svc -o json", SERVICES);
        let services = get_services(&runner).await.unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].dns_name(), "redis.cache.svc.cluster.local");
    }

    #[tokio::test]
    async fn test_get_services_failure() {
        let runner = ScriptedRunner::new().on(
            "kubectl get svc -o json",
            ShellResult::new(1, "", "connection refused"),
        );
        assert!(matches!(
            get_services(&runner).await,
            Err(BindError::CommandFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_secret_keys_sorted() {
        let runner = ScriptedRunner::new().ok("kubectl get secret mysvc -o json", SECRET);
        let keys = get_secret_keys(&runner, "mysvc").await.unwrap();
        assert_eq!(keys, vec!["host", "port", "username"]);
    }

    #[tokio::test]
    async fn test_secret_malformed() {
        let runner = ScriptedRunner::new().ok("kubectl get secret mysvc -o json", "not json");
        let err = get_secret_keys(&runner, "mysvc").await.unwrap_err();
        assert!(matches!(err, BindError::Parse(_)));
        assert!(err.to_string().starts_with("Could not get external service secret mysvc"));
    }

    #[tokio::test]
    async fn test_secret_missing() {
        let runner = ScriptedRunner::new().on(
            "kubectl get secret mysvc -o json",
            ShellResult::new(1, "", "NotFound"),
        );
        let err = get_secret_keys(&runner, "mysvc").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not get external service secret mysvc from the cluster"
        );
    }
}
