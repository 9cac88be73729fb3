//! Binding registry
//!
//! Each flow loads the chart manifest first, so a missing chart stops the
//! flow before any cluster call. Dismissing a prompt ends a flow quietly with
//! [`FlowOutcome::Cancelled`].

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use kubebind_chart::{ChartLocator, ChartManifest};
use kubebind_k8s::{CommandRunner, ServiceInstanceCache, bind_instance, get_secret_keys, get_services};
use kubebind_types::{
    BindError, BindingKind, Clipboard, Notifier, Picker, Result, ServiceBinding,
    ServiceCatalogBinding, ServiceInstance,
};

use crate::usage;

/// Where the chart to edit comes from
#[derive(Clone, Debug)]
pub enum ChartSource {
    /// A chart directory given explicitly
    Dir(PathBuf),
    /// Search the workspace, asking the user when several charts match
    Search(ChartLocator),
}

/// How a flow ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The named binding was added or removed
    Completed(String),
    /// The binding was already recorded; nothing changed
    AlreadyBound(String),
    /// There was nothing to choose from
    Nothing,
    /// The user dismissed a prompt
    Cancelled,
}

/// Adds and removes service bindings in a chart's values file
pub struct BindingRegistry {
    runner: Arc<dyn CommandRunner>,
    cache: Arc<ServiceInstanceCache>,
    charts: ChartSource,
    picker: Box<dyn Picker>,
    notifier: Arc<dyn Notifier>,
    clipboard: Box<dyn Clipboard>,
}

impl BindingRegistry {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        cache: Arc<ServiceInstanceCache>,
        charts: ChartSource,
        picker: Box<dyn Picker>,
        notifier: Arc<dyn Notifier>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        Self {
            runner,
            cache,
            charts,
            picker,
            notifier,
            clipboard,
        }
    }

    /// Bind the application to a plain Kubernetes Service by DNS name
    pub async fn add_service(&mut self, name: Option<&str>) -> Result<FlowOutcome> {
        let mut manifest = self.manifest().await?;

        let services = get_services(self.runner.as_ref()).await?;
        if services.is_empty() {
            self.notifier.info("No services found in current namespace");
            return Ok(FlowOutcome::Nothing);
        }

        let names: Vec<String> = services.iter().map(|s| s.name.clone()).collect();
        let Some(selected) = self
            .choose("Select a Kubernetes service to bind", &names, name)
            .await?
        else {
            return Ok(FlowOutcome::Cancelled);
        };

        let Some(service) = services.into_iter().find(|s| s.name == selected) else {
            return Err(BindError::NotFound(format!("No service named {}", selected)));
        };

        if manifest.exists(BindingKind::ServiceEnv, &service.name)? {
            debug!(name = %service.name, "service already bound");
            return Ok(FlowOutcome::AlreadyBound(service.name));
        }

        let binding = ServiceBinding {
            name: service.name.clone(),
            value: service.dns_name(),
        };
        manifest.append(&binding.into())?;

        self.write_clipboard(&usage::service_usage(&service.name));
        self.notifier.info("Wrote service info to your clipboard");

        Ok(FlowOutcome::Completed(service.name))
    }

    /// Remove a plain Service binding from the values file
    pub async fn remove_service(&mut self, name: Option<&str>) -> Result<FlowOutcome> {
        self.remove_binding(BindingKind::ServiceEnv, name).await
    }

    /// Bind the application to a service-catalog instance.
    ///
    /// Creates (or reuses) the catalog binding, records the binding's secret
    /// keys in the values file and puts a usage note on the clipboard.
    pub async fn add_external_service(&mut self, name: Option<&str>) -> Result<FlowOutcome> {
        let mut manifest = self.manifest().await?;

        let instances = self.cache.list(self.runner.as_ref()).await?;
        if instances.is_empty() {
            self.notifier.info("No External Services found in the current context");
            return Ok(FlowOutcome::Nothing);
        }

        let names: Vec<String> = instances.into_iter().map(|i| i.name).collect();
        let Some(selected) = self
            .choose(
                "Pick an External Service to add to the selected application",
                &names,
                name,
            )
            .await?
        else {
            return Ok(FlowOutcome::Cancelled);
        };

        let binding = bind_instance(self.runner.as_ref(), &selected).await?;

        if manifest.exists(BindingKind::ServiceCatalogEnv, &binding)? {
            debug!(%binding, "external service already bound");
            return Ok(FlowOutcome::AlreadyBound(binding));
        }

        let secret_keys = get_secret_keys(self.runner.as_ref(), &binding).await?;
        let record = ServiceCatalogBinding {
            name: binding.clone(),
            vars: secret_keys.clone(),
        };
        manifest.append(&record.into())?;

        self.notifier
            .info("Wrote Service Usage information to your clipboard.");
        self.write_clipboard(&usage::catalog_usage(&binding, &secret_keys));
        self.notifier.info(&format!(
            "Bound the application to External Service \"{}\"",
            selected
        ));

        Ok(FlowOutcome::Completed(binding))
    }

    /// Remove a service-catalog binding from the values file.
    ///
    /// The binding itself stays in the cluster since other applications may
    /// consume it.
    pub async fn remove_external_service(&mut self, name: Option<&str>) -> Result<FlowOutcome> {
        self.remove_binding(BindingKind::ServiceCatalogEnv, name).await
    }

    /// Service instances, optionally bypassing the cache
    pub async fn instances(&self, refresh: bool) -> Result<Vec<ServiceInstance>> {
        if refresh {
            self.cache.invalidate();
        }
        self.cache.list(self.runner.as_ref()).await
    }

    /// Load the values file of the chart this registry works on
    pub async fn manifest(&mut self) -> Result<ChartManifest> {
        let dir = match &self.charts {
            ChartSource::Dir(dir) => dir.clone(),
            ChartSource::Search(locator) => locator.pick_chart(Some(self.picker.as_mut())).await?,
        };
        ChartManifest::load(&dir)
    }

    async fn remove_binding(&mut self, kind: BindingKind, name: Option<&str>) -> Result<FlowOutcome> {
        let mut manifest = self.manifest().await?;

        let names = manifest.binding_names(kind)?;
        if names.is_empty() {
            self.notifier.info("No Services to remove.");
            return Ok(FlowOutcome::Nothing);
        }

        let Some(selected) = self.choose("Select a Service to remove", &names, name).await? else {
            return Ok(FlowOutcome::Cancelled);
        };

        manifest.remove(kind, &selected)?;
        Ok(FlowOutcome::Completed(selected))
    }

    /// Ask the user for one of `items`, unless a name was given up front
    async fn choose(
        &mut self,
        placeholder: &str,
        items: &[String],
        preselected: Option<&str>,
    ) -> Result<Option<String>> {
        match preselected {
            Some(name) if items.iter().any(|i| i == name) => Ok(Some(name.to_string())),
            Some(name) => Err(BindError::NotFound(format!(
                "'{}' is not one of: {}",
                name,
                items.join(", ")
            ))),
            None => self.picker.pick(placeholder, items).await,
        }
    }

    fn write_clipboard(&mut self, note: &str) {
        if let Err(e) = self.clipboard.write_text(note) {
            warn!(error = %e, "clipboard write failed");
            self.notifier
                .error(&format!("Could not write to the clipboard: {}", e));
        }
    }
}
