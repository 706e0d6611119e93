//! Remove command - uninstall a project version.

use anyhow::Result;
use clap::Args;
use console::style;

use crate::context::Context;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Project name
    pub name: String,

    /// Project version
    pub version: String,
}

pub fn execute(args: RemoveArgs, ctx: &Context) -> Result<i32> {
    let layout = ctx.config.install_layout();
    let dir_name = layout.dir_name(&args.name, &args.version);

    if layout.delete_project(&args.name, &args.version)? {
        println!(
            "{} Uninstalled \"{}\"",
            style("Success:").green().bold(),
            dir_name
        );
        Ok(0)
    } else {
        println!(
            "  {} \"{}\" is not installed",
            style("!").yellow(),
            dir_name
        );
        Ok(1)
    }
}
