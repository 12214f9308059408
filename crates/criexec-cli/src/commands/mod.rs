//! CLI command definitions and dispatch.

pub mod cp;
pub mod exec;
pub mod info;
pub mod inspect;
pub mod pid;
pub mod ps;
pub mod rm;
pub mod run;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use criexec_common::config::ClientConfig;
use criexec_common::types::{ContainerId, ContainerInfo, LabelSelector};
use criexec_runtime::RuntimeClient;

/// criexec — run commands and copy files inside CRI-managed containers.
#[derive(Parser, Debug)]
#[command(name = "criexec", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Connection and logging options.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Runtime RPC endpoint.
    #[arg(long, global = true, env = "CRIEXEC_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Logical namespace attached to every call.
    #[arg(long, global = true, env = "CRIEXEC_NAMESPACE")]
    pub namespace: Option<String>,

    /// Connect deadline in seconds.
    #[arg(long, global = true, env = "CRIEXEC_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Path to the namespace-entry helper.
    #[arg(long, global = true, env = "CRIEXEC_HELPER")]
    pub helper: Option<PathBuf>,

    /// JSON configuration file; flags override its values.
    #[arg(long, global = true, env = "CRIEXEC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,
}

impl GlobalArgs {
    /// Builds the client configuration from the file (if any) and flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ClientConfig::default(),
        };
        if let Some(endpoint) = &self.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(namespace) = &self.namespace {
            config.namespace.clone_from(namespace);
        }
        if let Some(timeout) = self.timeout {
            config.connect_timeout_secs = timeout;
        }
        if let Some(helper) = &self.helper {
            config.helper_path = Some(helper.clone());
        }
        Ok(config)
    }

    /// Connects to the configured runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the runtime is
    /// unreachable.
    pub fn connect(&self) -> anyhow::Result<RuntimeClient> {
        let config = self.client_config()?;
        tracing::debug!(endpoint = config.endpoint(), namespace = config.namespace(), "connecting");
        Ok(RuntimeClient::connect(&config)?)
    }
}

/// Selects one container by id, Kubernetes name, or label selector.
#[derive(Args, Debug, Default)]
#[group(required = true, multiple = false)]
pub struct TargetArgs {
    /// Runtime container id.
    #[arg(long)]
    pub id: Option<String>,

    /// Kubernetes container name (`io.kubernetes.container.name` label).
    #[arg(long)]
    pub name: Option<String>,

    /// Label selector, e.g. `app=web,tier=front`; the first match wins.
    #[arg(long)]
    pub selector: Option<LabelSelector>,
}

impl TargetArgs {
    /// Looks the target up and returns its projection.
    ///
    /// # Errors
    ///
    /// Returns an error if no container matches.
    pub fn resolve(&self, client: &RuntimeClient) -> anyhow::Result<ContainerInfo> {
        let info = if let Some(id) = &self.id {
            client.container_by_id(&ContainerId::new(id))?
        } else if let Some(name) = &self.name {
            client.container_by_name(name)?
        } else if let Some(selector) = &self.selector {
            client.container_by_selector(selector)?
        } else {
            anyhow::bail!("one of --id, --name or --selector is required");
        };
        Ok(info)
    }

    /// Returns the target id, skipping the lookup when `--id` was given.
    ///
    /// # Errors
    ///
    /// Returns an error if a name or selector matches no container.
    pub fn container_id(&self, client: &RuntimeClient) -> anyhow::Result<ContainerId> {
        match &self.id {
            Some(id) => Ok(ContainerId::new(id)),
            None => Ok(self.resolve(client)?.id),
        }
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the runtime name and version.
    Info(info::InfoArgs),
    /// List containers, optionally filtered by labels.
    Ps(ps::PsArgs),
    /// Print a container's projection as JSON.
    Inspect(inspect::InspectArgs),
    /// Print the host pid of a container's primary process.
    Pid(pid::PidArgs),
    /// Run a shell command inside a container's namespaces.
    Exec(exec::ExecArgs),
    /// Copy a tarball or directory into a container.
    Cp(cp::CpArgs),
    /// Stop and remove a container.
    Rm(rm::RmArgs),
    /// Run one command in a disposable container.
    Run(run::RunArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let client = cli.global.connect()?;
    let result = match cli.command {
        Command::Info(args) => info::execute(&client, &args),
        Command::Ps(args) => ps::execute(&client, &args),
        Command::Inspect(args) => inspect::execute(&client, &args),
        Command::Pid(args) => pid::execute(&client, &args),
        Command::Exec(args) => exec::execute(&client, &args),
        Command::Cp(args) => cp::execute(&client, &args),
        Command::Rm(args) => rm::execute(&client, &args),
        Command::Run(args) => run::execute(&client, &args),
    };
    client.close();
    result
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "criexec",
            "--endpoint",
            "unix:///run/containerd/containerd.sock",
            "--timeout",
            "3",
            "info",
        ])
        .unwrap();
        let config = cli.global.client_config().unwrap();
        assert_eq!(config.endpoint, "unix:///run/containerd/containerd.sock");
        assert_eq!(config.connect_timeout_secs, 3);
        assert_eq!(config.namespace(), "k8s.io");
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("criexec.json");
        std::fs::write(&path, r#"{"namespace":"chaos","connect_timeout_secs":20}"#).unwrap();
        let global = GlobalArgs {
            config: Some(path),
            timeout: Some(5),
            ..GlobalArgs::default()
        };

        let config = global.client_config().unwrap();
        assert_eq!(config.namespace, "chaos");
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[test]
    fn target_flags_are_mutually_exclusive() {
        let err = Cli::try_parse_from(["criexec", "pid", "--id", "abc", "--name", "web"]);
        assert!(err.is_err());
    }

    #[test]
    fn target_is_required() {
        assert!(Cli::try_parse_from(["criexec", "pid"]).is_err());
    }

    #[test]
    fn selector_flag_parses_pairs() {
        let cli = Cli::try_parse_from(["criexec", "inspect", "--selector", "app=web,tier=db"])
            .unwrap();
        let Command::Inspect(args) = cli.command else {
            unreachable!("parsed inspect");
        };
        let selector = args.target.selector.unwrap();
        assert_eq!(selector, LabelSelector::new().with("app", "web").with("tier", "db"));
    }
}
