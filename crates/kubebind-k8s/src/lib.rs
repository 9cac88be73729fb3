//! Kubernetes tooling integration for kubebind
//!
//! This crate shells out to `kubectl`, `svcat` and `kind`, parses their
//! output, and keeps the service-instance cache.

mod cache;
mod contexts;
mod gateway;
pub mod kind;
mod kubectl;
mod svcat;
mod top;
mod version;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cache::ServiceInstanceCache;
pub use contexts::{contexts_from_kubeconfig, read_contexts};
pub use gateway::{CommandRunner, ShellRunner, Tool, ToolPaths};
pub use kubectl::{get_secret_keys, get_services};
pub use svcat::{bind_instance, get_instances, parse_instances};
pub use top::{format_usage, parse_usage, resource_usage};
pub use version::{parse_server_version, server_version};

// Re-export types that are used in our public API
pub use kubebind_types::{
    BindError, ContextInfo, ResourceUsage, ServerVersion, ServiceInstance, ServiceReference,
    ShellResult, UsageTarget,
};
