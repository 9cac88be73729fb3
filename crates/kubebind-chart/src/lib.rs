//! Chart discovery and binding storage for kubebind
//!
//! This crate finds the chart a command applies to and reads and rewrites the
//! binding sections of its `values.yaml`.

mod locator;
mod manifest;

pub use locator::{CHART_FILE, ChartLocator, DEFAULT_SEARCH_LIMIT};
pub use manifest::{ChartManifest, VALUES_FILE};

// Re-export types used in our public API
pub use kubebind_types::{BindingKind, BindingRecord, ServiceBinding, ServiceCatalogBinding};
