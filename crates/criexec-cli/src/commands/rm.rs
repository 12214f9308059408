//! `criexec rm` — Stop and remove a container.

use clap::Args;
use criexec_runtime::RuntimeClient;

use super::TargetArgs;

/// Arguments for the `rm` command.
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Container to remove.
    #[command(flatten)]
    pub target: TargetArgs,

    /// Accepted for compatibility; removal always stops first.
    #[arg(short, long)]
    pub force: bool,
}

/// Executes the `rm` command.
///
/// # Errors
///
/// Returns an error if the stop or remove RPC fails.
pub fn execute(client: &RuntimeClient, args: &RmArgs) -> anyhow::Result<()> {
    let id = args.target.container_id(client)?;
    client.remove_container(&id, args.force)?;
    println!("{id}");
    Ok(())
}
