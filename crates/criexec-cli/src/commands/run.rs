//! `criexec run` — Run one command in a disposable container.

use std::collections::HashMap;
use std::time::Duration;

use clap::Args;
use criexec_common::types::{
    ContainerConfig, ContainerId, HostConfig, LabelSelector, NetworkingConfig,
};
use criexec_runtime::{EphemeralSpec, RuntimeClient};

use super::TargetArgs;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image to pull and run.
    #[arg(long)]
    pub image: String,

    /// Name given to the new container.
    #[arg(long, default_value = "criexec-ephemeral")]
    pub name: String,

    /// Exec timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub exec_timeout: u64,

    /// Memory limit in bytes (0 for none).
    #[arg(long, default_value_t = 0)]
    pub memory: i64,

    /// Environment entry `KEY=VALUE`; repeatable.
    #[arg(long = "env", short = 'e')]
    pub env: Vec<String>,

    /// Labels for the new container (`k=v,k2=v2`).
    #[arg(long)]
    pub labels: Option<LabelSelector>,

    /// Working directory inside the container.
    #[arg(long, default_value = "")]
    pub workdir: String,

    /// Container the run is aimed at, recorded in the logs.
    #[arg(long = "target-id")]
    pub target_id: Option<String>,

    /// Command to run; each word becomes one argument.
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

impl RunArgs {
    fn spec(&self, client: &RuntimeClient) -> anyhow::Result<EphemeralSpec> {
        let labels: HashMap<String, String> = self
            .labels
            .iter()
            .flat_map(LabelSelector::iter)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let target = match &self.target_id {
            Some(id) => Some(
                TargetArgs {
                    id: Some(id.clone()),
                    ..TargetArgs::default()
                }
                .resolve(client)?,
            ),
            None => None,
        };

        Ok(EphemeralSpec {
            config: ContainerConfig {
                image: self.image.clone(),
                cmd: self.command.clone(),
                env: self.env.clone(),
                labels,
                working_dir: self.workdir.clone(),
                ..ContainerConfig::default()
            },
            host_config: HostConfig {
                memory: self.memory,
            },
            networking_config: NetworkingConfig::default(),
            name: self.name.clone(),
            timeout: Duration::from_secs(self.exec_timeout),
            command: self.command.join(" "),
            target,
        })
    }
}

/// Executes the `run` command.
///
/// Creates the container, runs the command, then stops and removes it.
/// When a stage after creation fails, the container is left in place and
/// its id is reported so it can be removed with `criexec rm`.
///
/// # Errors
///
/// Returns an error naming the failed stage.
pub fn execute(client: &RuntimeClient, args: &RunArgs) -> anyhow::Result<()> {
    let spec = args.spec(client)?;
    match client.execute_and_remove(&spec) {
        Ok(outcome) => {
            print!("{}", outcome.stdout);
            eprint!("{}", outcome.stderr);
            Ok(())
        }
        Err(err) => {
            let id = err.container_id.clone();
            Err(left_behind(id.as_ref(), err.into()))
        }
    }
}

fn left_behind(id: Option<&ContainerId>, err: anyhow::Error) -> anyhow::Error {
    match id {
        Some(id) => err.context(format!(
            "container {id} was left behind; remove it with `criexec rm --id {id}`"
        )),
        None => err,
    }
}
