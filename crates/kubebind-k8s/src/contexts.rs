//! Kubeconfig contexts

use kube::config::Kubeconfig;

use kubebind_types::{BindError, ContextInfo, Result};

/// Read all contexts from the default kubeconfig
pub fn read_contexts() -> Result<Vec<ContextInfo>> {
    let kubeconfig = Kubeconfig::read().map_err(|e| {
        BindError::NotFound(format!(
            "Failed to read kubeconfig. Is kubectl configured? ({})",
            e
        ))
    })?;

    Ok(contexts_from_kubeconfig(&kubeconfig))
}

/// Get all available contexts from a parsed kubeconfig
pub fn contexts_from_kubeconfig(kubeconfig: &Kubeconfig) -> Vec<ContextInfo> {
    let current_context = kubeconfig.current_context.as_ref();

    kubeconfig
        .contexts
        .iter()
        .map(|ctx| {
            let context = ctx.context.as_ref();
            ContextInfo::new(
                ctx.name.clone(),
                context.map(|c| c.cluster.clone()).unwrap_or_default(),
                context.and_then(|c| c.namespace.clone()),
                Some(&ctx.name) == current_context,
            )
        })
        .collect()
}
