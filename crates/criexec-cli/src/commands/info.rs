//! `criexec info` — Show the runtime name and version.

use clap::Args;
use criexec_runtime::RuntimeClient;

/// Arguments for the `info` command.
#[derive(Args, Debug)]
pub struct InfoArgs {}

/// Executes the `info` command.
///
/// # Errors
///
/// Returns an error if the version RPC fails.
pub fn execute(client: &RuntimeClient, _args: &InfoArgs) -> anyhow::Result<()> {
    let version = client.version()?;
    println!("Endpoint:       {}", client.service().endpoint());
    println!("Runtime:        {} {}", version.runtime_name, version.runtime_version);
    println!("Runtime API:    {}", version.runtime_api_version);
    println!("Helper:         {}", client.bridge().helper().display());
    Ok(())
}
