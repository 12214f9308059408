//! `criexec inspect` — Print a container's projection.

use clap::Args;
use criexec_runtime::RuntimeClient;

use super::TargetArgs;

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Container to inspect.
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Executes the `inspect` command.
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub fn execute(client: &RuntimeClient, args: &InspectArgs) -> anyhow::Result<()> {
    let info = args.target.resolve(client)?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
