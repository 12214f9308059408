//! `criexec ps` — List containers.

use clap::Args;
use criexec_common::types::LabelSelector;
use criexec_runtime::RuntimeClient;

use crate::output;

/// Arguments for the `ps` command.
#[derive(Args, Debug)]
pub struct PsArgs {
    /// Only list containers carrying these labels (`k=v,k2=v2`).
    #[arg(long, short = 'l')]
    pub selector: Option<LabelSelector>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `ps` command.
///
/// # Errors
///
/// Returns an error if listing fails.
pub fn execute(client: &RuntimeClient, args: &PsArgs) -> anyhow::Result<()> {
    let selector = args.selector.clone().unwrap_or_default();
    let containers = client.containers(&selector)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&containers)?);
    } else if containers.is_empty() {
        println!("No containers found.");
    } else {
        print!("{}", output::container_table(&containers));
    }
    Ok(())
}
