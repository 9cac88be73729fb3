//! Cluster explorer tree
//!
//! Context nodes are labelled with their server version, and the active
//! context gets an "External Services" folder listing catalog instances.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use kubebind_k8s::{CommandRunner, ServiceInstanceCache, server_version};
use kubebind_types::{ContextInfo, Notifier, ServerVersion, ServiceInstance};

/// Context value of the External Services folder
pub const FOLDER_CONTEXT_VALUE: &str = "svcat.folder";

/// Context value of a single external service
pub const SERVICE_CONTEXT_VALUE: &str = "svcat.externalservice";

const FOLDER_LABEL: &str = "External Services";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Context,
    ContextInactive,
    Folder,
    ExternalService,
}

/// A renderable explorer node
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeItem {
    pub label: String,
    pub node_type: NodeType,
    pub context_value: Option<&'static str>,
    pub children: Vec<TreeItem>,
}

impl TreeItem {
    fn folder(instances: Vec<ServiceInstance>) -> Self {
        Self {
            label: FOLDER_LABEL.to_string(),
            node_type: NodeType::Folder,
            context_value: Some(FOLDER_CONTEXT_VALUE),
            children: instances.into_iter().map(Self::service).collect(),
        }
    }

    fn service(instance: ServiceInstance) -> Self {
        Self {
            label: instance.name,
            node_type: NodeType::ExternalService,
            context_value: Some(SERVICE_CONTEXT_VALUE),
            children: Vec::new(),
        }
    }
}

/// Only the active context gets the External Services folder
pub fn contributes_children(parent: NodeType) -> bool {
    parent == NodeType::Context
}

/// Append the server version to a context label when it is known
pub fn customize_label(label: &str, version: Option<&ServerVersion>) -> String {
    match version {
        Some(version) => format!("{} [{}]", label, version),
        None => label.to_string(),
    }
}

/// Builds the explorer tree
pub struct Explorer {
    runner: Arc<dyn CommandRunner>,
    cache: Arc<ServiceInstanceCache>,
    version_timeout: Duration,
}

impl Explorer {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        cache: Arc<ServiceInstanceCache>,
        version_timeout: Duration,
    ) -> Self {
        Self {
            runner,
            cache,
            version_timeout,
        }
    }

    /// One node per context, versions looked up side by side
    pub async fn build(
        &self,
        contexts: &[ContextInfo],
        notifier: &dyn Notifier,
        cancel: &CancellationToken,
    ) -> Vec<TreeItem> {
        let versions = join_all(contexts.iter().map(|ctx| {
            server_version(self.runner.as_ref(), &ctx.name, self.version_timeout, cancel)
        }))
        .await;

        let mut nodes = Vec::with_capacity(contexts.len());
        for (ctx, version) in contexts.iter().zip(versions) {
            let node_type = if ctx.is_current {
                NodeType::Context
            } else {
                NodeType::ContextInactive
            };

            let children = if contributes_children(node_type) {
                vec![self.external_services(notifier).await]
            } else {
                Vec::new()
            };

            nodes.push(TreeItem {
                label: customize_label(&ctx.name, version.as_ref()),
                node_type,
                context_value: None,
                children,
            });
        }

        nodes
    }

    /// The External Services folder; empty if instances can't be listed
    pub async fn external_services(&self, notifier: &dyn Notifier) -> TreeItem {
        let instances = match self.cache.list(self.runner.as_ref()).await {
            Ok(instances) => instances,
            Err(e) => {
                warn!(error = %e, "could not list service instances");
                notifier.error(&e.to_string());
                Vec::new()
            }
        };
        TreeItem::folder(instances)
    }
}

/// Indented text rendering of a tree
pub fn render_tree(items: &[TreeItem]) -> String {
    let mut out = String::new();
    for item in items {
        render_item(item, 0, &mut out);
    }
    out
}

fn render_item(item: &TreeItem, depth: usize, out: &mut String) {
    let marker = if item.children.is_empty() { "-" } else { "+" };
    out.push_str(&"  ".repeat(depth));
    out.push_str(marker);
    out.push(' ');
    out.push_str(&item.label);
    out.push('\n');
    for child in &item.children {
        render_item(child, depth + 1, out);
    }
}
