//! Shared types for kubebind
//!
//! This crate contains data structures used across multiple kubebind crates,
//! the error taxonomy, and the interaction ports (picker, notifier, clipboard)
//! that the binary implements.

mod error;
mod ports;

pub use error::{BindError, Result};
pub use ports::{Clipboard, Notifier, Picker};

use serde::{Deserialize, Serialize};

// ============================================================================
// Kubernetes Resource Types
// ============================================================================

/// Kubernetes context information read from kubeconfig
#[derive(Clone, Debug)]
pub struct ContextInfo {
    pub name: String,
    pub cluster: String,
    pub namespace: Option<String>,
    pub is_current: bool,
}

impl ContextInfo {
    pub fn new(name: String, cluster: String, namespace: Option<String>, is_current: bool) -> Self {
        Self {
            name,
            cluster,
            namespace,
            is_current,
        }
    }
}

/// A plain Kubernetes Service as listed by `kubectl get svc`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceReference {
    pub name: String,
    pub namespace: String,
}

impl ServiceReference {
    pub fn new(name: String, namespace: String) -> Self {
        Self { name, namespace }
    }

    /// Cluster-local DNS name of the service
    pub fn dns_name(&self) -> String {
        format!("{}.{}.svc.cluster.local", self.name, self.namespace)
    }
}

/// A provisioned service-catalog instance (one row of `svcat get instances`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceInstance {
    pub name: String,
    pub namespace: String,
    pub class: String,
    pub plan: String,
    pub status: String,
}

impl ServiceInstance {
    pub fn new(name: String, namespace: String, class: String, plan: String, status: String) -> Self {
        Self {
            name,
            namespace,
            class,
            plan,
            status,
        }
    }
}

/// API server version reported by `kubectl version`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerVersion {
    pub major: String,
    pub minor: String,
}

impl std::fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Resource usage of a node or pod as (field, value) pairs in column order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceUsage {
    pub fields: Vec<(String, String)>,
}

/// Kind of object `kubectl top` reports on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsageTarget {
    Node,
    Pod,
}

impl UsageTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Pod => "pod",
        }
    }
}

// ============================================================================
// Binding Types
// ============================================================================

/// The two kinds of binding a chart's values file can record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Plain Kubernetes Service, recorded under `serviceEnv`
    ServiceEnv,
    /// Service-catalog secret, recorded under `serviceCatalogEnv`
    ServiceCatalogEnv,
}

impl BindingKind {
    /// Top-level key in `values.yaml`
    pub fn key(&self) -> &'static str {
        match self {
            Self::ServiceEnv => "serviceEnv",
            Self::ServiceCatalogEnv => "serviceCatalogEnv",
        }
    }

    /// Short human label
    pub fn label(&self) -> &'static str {
        match self {
            Self::ServiceEnv => "service",
            Self::ServiceCatalogEnv => "external service",
        }
    }
}

/// Binding to a plain Service by DNS name
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBinding {
    pub name: String,
    pub value: String,
}

/// Binding to a service-catalog secret; `vars` are the secret's key names
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalogBinding {
    pub name: String,
    pub vars: Vec<String>,
}

/// A binding record of either kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingRecord {
    Service(ServiceBinding),
    Catalog(ServiceCatalogBinding),
}

impl BindingRecord {
    pub fn name(&self) -> &str {
        match self {
            Self::Service(b) => &b.name,
            Self::Catalog(b) => &b.name,
        }
    }

    pub fn kind(&self) -> BindingKind {
        match self {
            Self::Service(_) => BindingKind::ServiceEnv,
            Self::Catalog(_) => BindingKind::ServiceCatalogEnv,
        }
    }

    /// YAML form as stored in the values file
    pub fn to_yaml(&self) -> Result<serde_yaml::Value> {
        let value = match self {
            Self::Service(b) => serde_yaml::to_value(b)?,
            Self::Catalog(b) => serde_yaml::to_value(b)?,
        };
        Ok(value)
    }
}

impl From<ServiceBinding> for BindingRecord {
    fn from(binding: ServiceBinding) -> Self {
        Self::Service(binding)
    }
}

impl From<ServiceCatalogBinding> for BindingRecord {
    fn from(binding: ServiceCatalogBinding) -> Self {
        Self::Catalog(binding)
    }
}

// ============================================================================
// Process Types
// ============================================================================

/// Buffered result of an external command
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShellResult {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ShellResult {
    pub fn new(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}
