//! Service binding workflows for kubebind
//!
//! This crate ties the chart manifest, the service-instance cache and the
//! external CLIs together into the add/remove binding flows, and builds the
//! cluster explorer tree.

mod explorer;
mod registry;
mod usage;

#[cfg(test)]
mod fakes;

pub use explorer::{
    Explorer, FOLDER_CONTEXT_VALUE, NodeType, SERVICE_CONTEXT_VALUE, TreeItem, contributes_children,
    customize_label, render_tree,
};
pub use registry::{BindingRegistry, ChartSource, FlowOutcome};
pub use usage::{catalog_usage, service_usage};
