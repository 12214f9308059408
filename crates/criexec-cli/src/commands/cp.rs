//! `criexec cp` — Copy a tarball or directory into a container.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use criexec_runtime::RuntimeClient;

use super::TargetArgs;
use crate::archive;

/// Arguments for the `cp` command.
#[derive(Args, Debug)]
pub struct CpArgs {
    /// Destination container.
    #[command(flatten)]
    pub target: TargetArgs,

    /// Gzip tarball, or a directory to pack first.
    pub src: PathBuf,

    /// Directory inside the container to extract into.
    pub dst: PathBuf,

    /// Name of the extracted directory (informational).
    #[arg(long, default_value = "")]
    pub extract_dir_name: String,

    /// Overwrite existing files (extraction always overwrites).
    #[arg(long)]
    pub overwrite: bool,
}

/// Executes the `cp` command.
///
/// # Errors
///
/// Returns an error if packing, lookup, upload or extraction fails.
pub fn execute(client: &RuntimeClient, args: &CpArgs) -> anyhow::Result<()> {
    let id = args.target.container_id(client)?;

    let scratch = tempfile::tempdir().context("creating scratch directory")?;
    let src = if args.src.is_dir() {
        archive::pack_dir(&args.src, scratch.path())?
    } else {
        args.src.clone()
    };

    client
        .copy_to_container(&id, &src, &args.dst, &args.extract_dir_name, args.overwrite)
        .with_context(|| format!("copying {} into {id}", args.src.display()))?;
    println!("{} -> {id}:{}", args.src.display(), args.dst.display());
    Ok(())
}
