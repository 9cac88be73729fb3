use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;

use kubebind_chart::{BindingKind, ChartLocator};
use kubebind_k8s::kind::{
    DEFAULT_IMAGE_VERSION, KIND_CLUSTER_PROVIDER, SETTING_IMAGE_VERSION, WizardStep, create_args,
    create_cluster, next_page,
};
use kubebind_k8s::{
    BindError, CommandRunner, ServiceInstanceCache, ShellRunner, UsageTarget, read_contexts,
    resource_usage, server_version,
};
use kubebind_registry::{BindingRegistry, ChartSource, Explorer, FlowOutcome, render_tree};
use kubebind_tui::TuiPicker;
use kubebind_types::{Clipboard, Notifier, Picker};

mod clipboard;
mod config;
mod console;

use clipboard::{StdoutClipboard, SystemClipboard};
use config::Config;
use console::{ConsoleNotifier, NonInteractivePicker};

/// kubebind - bind Helm chart values to Kubernetes services
#[derive(Parser, Debug)]
#[command(name = "kubebind")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Workspace folder searched for charts (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Chart directory to edit, skipping the workspace search
    #[arg(long, global = true, value_name = "DIR")]
    chart: Option<PathBuf>,

    /// Config file (defaults to ~/.config/kubebind/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print usage notes instead of copying them to the clipboard
    #[arg(long, global = true)]
    no_clipboard: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bind to a Kubernetes Service by DNS name
    Service {
        #[command(subcommand)]
        action: BindingAction,
    },

    /// Bind to a service-catalog instance
    External {
        #[command(subcommand)]
        action: BindingAction,
    },

    /// List the bindings recorded in the chart
    Bindings {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },

    /// List service-catalog instances
    Instances {
        /// Ignore cached results
        #[arg(long)]
        refresh: bool,
    },

    /// Show kubeconfig contexts with server versions and External Services
    Explore,

    /// Resource usage of a node or pod
    Top {
        #[arg(value_enum)]
        target: TargetArg,
        name: String,
    },

    /// Server version of a context (defaults to the current one)
    Version {
        #[arg(long)]
        context: Option<String>,
    },

    /// Local clusters
    Cluster {
        #[command(subcommand)]
        action: ClusterAction,
    },
}

#[derive(Subcommand, Debug)]
enum BindingAction {
    /// Add a binding, picking the service interactively unless --name is given
    Add {
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a binding from the chart
    Remove {
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ClusterAction {
    /// Create a Kind cluster
    Create {
        /// Node image version
        #[arg(long, default_value = DEFAULT_IMAGE_VERSION)]
        image_version: String,

        /// Print the kind command instead of running it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Service,
    External,
}

impl From<KindArg> for BindingKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Service => BindingKind::ServiceEnv,
            KindArg::External => BindingKind::ServiceCatalogEnv,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TargetArg {
    Node,
    Pod,
}

impl From<TargetArg> for UsageTarget {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::Node => UsageTarget::Node,
            TargetArg::Pod => UsageTarget::Pod,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let cancel = CancellationToken::new();
    let result = tokio::select! {
        result = run(args, &cancel) => result,
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            Err(BindError::Cancelled.into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// Print a failure; a dismissed prompt is not one
fn report(e: &anyhow::Error) -> ExitCode {
    match e.downcast_ref::<BindError>() {
        Some(err) if err.is_cancelled() => ExitCode::SUCCESS,
        Some(BindError::CommandFailed { message, stderr }) => {
            eprintln!("Error: {}", message);
            if !stderr.trim().is_empty() {
                eprintln!("{}", stderr.trim_end());
            }
            ExitCode::FAILURE
        }
        _ => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Everything a command may need, built once from args and config
struct Session {
    config: Config,
    runner: Arc<dyn CommandRunner>,
    cache: Arc<ServiceInstanceCache>,
    notifier: Arc<dyn Notifier>,
}

impl Session {
    fn new(config: Config) -> Self {
        let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner::new(config.tool_paths()));
        let cache = Arc::new(ServiceInstanceCache::new(config.instance_cache_ttl()));
        Self {
            config,
            runner,
            cache,
            notifier: Arc::new(ConsoleNotifier),
        }
    }

    fn registry(&self, args: &Args) -> Result<BindingRegistry> {
        let charts = match &args.chart {
            Some(dir) => ChartSource::Dir(dir.clone()),
            None => {
                let root = match &args.workspace {
                    Some(dir) => dir.clone(),
                    None => std::env::current_dir()?,
                };
                ChartSource::Search(
                    ChartLocator::new(root).with_limit(self.config.chart_search_limit),
                )
            }
        };

        Ok(BindingRegistry::new(
            self.runner.clone(),
            self.cache.clone(),
            charts,
            picker(),
            self.notifier.clone(),
            clipboard(args.no_clipboard),
        ))
    }
}

fn picker() -> Box<dyn Picker> {
    if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() {
        Box::new(TuiPicker::new())
    } else {
        Box::new(NonInteractivePicker)
    }
}

fn clipboard(disabled: bool) -> Box<dyn Clipboard> {
    if disabled {
        Box::new(StdoutClipboard)
    } else {
        Box::new(SystemClipboard)
    }
}

async fn run(args: Args, cancel: &CancellationToken) -> Result<()> {
    let session = Session::new(Config::load(args.config.as_deref())?);

    match &args.command {
        Command::Service { action } => {
            let mut registry = session.registry(&args)?;
            let outcome = match action {
                BindingAction::Add { name } => registry.add_service(name.as_deref()).await?,
                BindingAction::Remove { name } => registry.remove_service(name.as_deref()).await?,
            };
            print_outcome(&outcome);
        }

        Command::External { action } => {
            let mut registry = session.registry(&args)?;
            let outcome = match action {
                BindingAction::Add { name } => {
                    registry.add_external_service(name.as_deref()).await?
                }
                BindingAction::Remove { name } => {
                    registry.remove_external_service(name.as_deref()).await?
                }
            };
            print_outcome(&outcome);
        }

        Command::Bindings { kind } => {
            let manifest = session.registry(&args)?.manifest().await?;
            let kinds = match kind {
                Some(kind) => vec![BindingKind::from(*kind)],
                None => vec![BindingKind::ServiceEnv, BindingKind::ServiceCatalogEnv],
            };
            for kind in kinds {
                for name in manifest.binding_names(kind)? {
                    println!("{}\t{}", kind.key(), name);
                }
            }
        }

        Command::Instances { refresh } => {
            let instances = session.registry(&args)?.instances(*refresh).await?;
            println!("NAME\tNAMESPACE\tCLASS\tPLAN\tSTATUS");
            for i in instances {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    i.name, i.namespace, i.class, i.plan, i.status
                );
            }
        }

        Command::Explore => {
            let contexts = read_contexts()?;
            let explorer = Explorer::new(
                session.runner.clone(),
                session.cache.clone(),
                session.config.version_timeout(),
            );
            let tree = explorer
                .build(&contexts, session.notifier.as_ref(), cancel)
                .await;
            print!("{}", render_tree(&tree));
        }

        Command::Top { target, name } => {
            let usage =
                resource_usage(session.runner.as_ref(), UsageTarget::from(*target), name).await?;
            println!("{}", usage);
        }

        Command::Version { context } => {
            let context = match context {
                Some(context) => context.clone(),
                None => read_contexts()?
                    .into_iter()
                    .find(|c| c.is_current)
                    .map(|c| c.name)
                    .ok_or_else(|| BindError::NotFound("No current context set".to_string()))?,
            };
            let version = server_version(
                session.runner.as_ref(),
                &context,
                session.config.version_timeout(),
                cancel,
            )
            .await;
            match version {
                Some(version) => println!("{} [{}]", context, version),
                None => println!("{}", context),
            }
        }

        Command::Cluster {
            action: ClusterAction::Create {
                image_version,
                dry_run,
            },
        } => {
            let settings =
                BTreeMap::from([(SETTING_IMAGE_VERSION.to_string(), image_version.clone())]);

            let settings_page = next_page(WizardStep::SelectClusterType, &settings);
            print!("{}", settings_page.render());

            if *dry_run {
                println!(
                    "{} {}",
                    session.config.kind,
                    create_args(&settings_page.settings).join(" ")
                );
                return Ok(());
            }

            let create_page = next_page(settings_page.step, &settings_page.settings);
            print!("{}", create_page.render());

            let output =
                create_cluster(session.runner.as_ref(), &create_page.settings).await?;
            print!("{}", output);
            session.notifier.info(&format!(
                "{} cluster created",
                KIND_CLUSTER_PROVIDER.display_name
            ));
        }
    }

    Ok(())
}

fn print_outcome(outcome: &FlowOutcome) {
    match outcome {
        FlowOutcome::Completed(name) => println!("Updated binding {}", name),
        FlowOutcome::AlreadyBound(name) => println!("{} is already bound", name),
        FlowOutcome::Nothing | FlowOutcome::Cancelled => {}
    }
}
