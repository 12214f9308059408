//! `criexec exec` — Run a shell command inside a container's namespaces.

use anyhow::Context;
use clap::Args;
use criexec_runtime::RuntimeClient;

use super::TargetArgs;

/// Arguments for the `exec` command.
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Container to enter.
    #[command(flatten)]
    pub target: TargetArgs,

    /// Command line, passed to `/bin/sh -c` as one string.
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

/// Executes the `exec` command.
///
/// Enters the pid, mount and network namespaces of the container's primary
/// process through the helper and prints whatever the command produced.
///
/// # Errors
///
/// Returns an error if the container cannot be resolved or the command
/// exits nonzero.
pub fn execute(client: &RuntimeClient, args: &ExecArgs) -> anyhow::Result<()> {
    let id = args.target.container_id(client)?;
    let command = args.command.join(" ");
    let output = client
        .exec_container(&id, &command)
        .with_context(|| format!("exec in {id}"))?;
    print!("{output}");
    Ok(())
}
