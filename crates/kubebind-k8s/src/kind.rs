//! Kind cluster provider
//!
//! A two-page create wizard: collect settings, then create the cluster.
//! Settings gathered on earlier pages are carried forward on every page.

use std::collections::BTreeMap;

use tracing::info;

use kubebind_types::{BindError, Result};

use crate::gateway::{CommandRunner, Tool};

/// Setting key for the node image version
pub const SETTING_IMAGE_VERSION: &str = "imageversion";

/// Image version used when none is given
pub const DEFAULT_IMAGE_VERSION: &str = "latest";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClusterAction {
    Create,
}

/// Static description of a cluster provider
#[derive(Debug)]
pub struct ClusterProvider {
    pub id: &'static str,
    pub display_name: &'static str,
    pub supported_actions: &'static [ClusterAction],
}

pub const KIND_CLUSTER_PROVIDER: ClusterProvider = ClusterProvider {
    id: "kind",
    display_name: "Kind",
    supported_actions: &[ClusterAction::Create],
};

/// Page that sent the user to the next one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardStep {
    SelectClusterType,
    Settings,
    Create,
}

/// One rendered wizard page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardPage {
    pub step: WizardStep,
    pub title: String,
    pub body: String,
    /// Caption of the button that advances the wizard; `None` on the last page
    pub button: Option<&'static str>,
    pub settings: BTreeMap<String, String>,
}

impl WizardPage {
    fn new(
        step: WizardStep,
        title: &str,
        body: String,
        button: Option<&'static str>,
        settings: &BTreeMap<String, String>,
    ) -> Self {
        Self {
            step,
            title: title.to_string(),
            body,
            button,
            settings: settings.clone(),
        }
    }

    /// Plain-text rendering for the terminal
    pub fn render(&self) -> String {
        let mut out = format!("== {} ==\n{}\n", self.title, self.body);
        if let Some(button) = self.button {
            out.push_str(&format!("[{}]\n", button));
        }
        out
    }
}

/// Page shown after the user leaves `sending_step`
pub fn next_page(sending_step: WizardStep, settings: &BTreeMap<String, String>) -> WizardPage {
    match sending_step {
        WizardStep::SelectClusterType => {
            let version = image_version(settings);
            WizardPage::new(
                WizardStep::Settings,
                "Cluster Settings",
                format!("Image version: {}", version),
                Some("Create"),
                settings,
            )
        }
        WizardStep::Settings => WizardPage::new(
            WizardStep::Create,
            "Cluster Created",
            format!(
                "Creating a Kind cluster with node image version {}",
                image_version(settings)
            ),
            None,
            settings,
        ),
        WizardStep::Create => WizardPage::new(
            WizardStep::Create,
            "Internal error",
            "The wizard has no page after cluster creation".to_string(),
            None,
            settings,
        ),
    }
}

fn image_version(settings: &BTreeMap<String, String>) -> &str {
    settings
        .get(SETTING_IMAGE_VERSION)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_IMAGE_VERSION)
}

/// Arguments for `kind create cluster`
pub fn create_args(settings: &BTreeMap<String, String>) -> Vec<String> {
    let mut args = vec!["create".to_string(), "cluster".to_string()];
    let version = image_version(settings);
    if version != DEFAULT_IMAGE_VERSION {
        args.push("--image".to_string());
        args.push(format!("kindest/node:{}", version));
    }
    args
}

/// Create the cluster described by `settings`
///
/// Executes: kind create cluster [--image kindest/node:<version>]
pub async fn create_cluster<R: CommandRunner + ?Sized>(
    runner: &R,
    settings: &BTreeMap<String, String>,
) -> Result<String> {
    let args = create_args(settings);
    let result = runner.invoke(Tool::Kind, &args).await?;

    if !result.success() {
        return Err(BindError::command_failed(
            "Could not create Kind cluster",
            result.stderr,
        ));
    }

    info!(version = image_version(settings), "kind cluster created");
    // kind reports progress on stderr
    Ok(if result.stdout.trim().is_empty() {
        result.stderr
    } else {
        result.stdout
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;
    use kubebind_types::ShellResult;

    fn settings(version: &str) -> BTreeMap<String, String> {
        BTreeMap::from([(SETTING_IMAGE_VERSION.to_string(), version.to_string())])
    }

    #[test]
    fn test_wizard_walks_settings_then_create() {
        let s = settings("v1.29.2");

        let page = next_page(WizardStep::SelectClusterType, &s);
        assert_eq!(page.step, WizardStep::Settings);
        assert_eq!(page.button, Some("Create"));

        let page = next_page(page.step, &page.settings);
        assert_eq!(page.step, WizardStep::Create);
        assert!(page.button.is_none());
        assert!(page.body.contains("v1.29.2"));
    }

    #[test]
    fn test_wizard_past_last_page() {
        let page = next_page(WizardStep::Create, &BTreeMap::new());
        assert_eq!(page.title, "Internal error");
    }

    #[test]
    fn test_create_args() {
        assert_eq!(create_args(&BTreeMap::new()), vec!["create", "cluster"]);
        assert_eq!(
            create_args(&settings("v1.29.2")),
            vec!["create", "cluster", "--image", "kindest/node:v1.29.2"]
        );
    }

    #[test]
    fn test_provider_metadata() {
        assert_eq!(KIND_CLUSTER_PROVIDER.id, "kind");
        assert_eq!(KIND_CLUSTER_PROVIDER.supported_actions, &[ClusterAction::Create]);
    }

    #[tokio::test]
    async fn test_create_cluster_failure() {
        let runner = ScriptedRunner::new().on(
            "kind create cluster",
            ShellResult::new(1, "", "docker not running"),
        );
        let err = create_cluster(&runner, &BTreeMap::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Could not create Kind cluster");
    }
}
