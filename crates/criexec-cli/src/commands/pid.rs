//! `criexec pid` — Print the host pid of a container's primary process.

use clap::Args;
use criexec_runtime::RuntimeClient;

use super::TargetArgs;

/// Arguments for the `pid` command.
#[derive(Args, Debug)]
pub struct PidArgs {
    /// Container whose pid to resolve.
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Executes the `pid` command.
///
/// # Errors
///
/// Returns an error if the lookup or pid resolution fails.
pub fn execute(client: &RuntimeClient, args: &PidArgs) -> anyhow::Result<()> {
    let id = args.target.container_id(client)?;
    let pid = client.pid_by_id(&id)?;
    println!("{pid}");
    Ok(())
}
