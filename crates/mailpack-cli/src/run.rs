//! Run command - start an installed project and wait for it.

use anyhow::{Context as _, Result};
use clap::Args;

use mailpack_core::Launcher;

use crate::context::Context;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Project name
    pub name: String,

    /// Project version
    pub version: String,

    /// Start the project and return without waiting for it
    #[arg(long)]
    pub detach: bool,
}

pub fn execute(args: RunArgs, ctx: &Context) -> Result<i32> {
    let layout = ctx.config.install_layout();
    let launcher = Launcher::new(ctx.config.install.interpreter.clone());

    let mut child = launcher.run(&layout, &args.name, &args.version)?;
    if args.detach {
        println!("Started {} {} (pid {})", args.name, args.version, child.id());
        return Ok(0);
    }

    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for {} {}", args.name, args.version))?;
    Ok(status.code().unwrap_or(1))
}
