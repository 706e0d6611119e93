//! Publish command - bundle files and mail them as a project version.

use anyhow::{bail, Context as _, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;

use crate::context::Context;
use crate::progress;

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Project name
    pub name: String,

    /// Project version
    pub version: String,

    /// File to include at the archive root (can be used multiple times)
    #[arg(short, long = "file", action = clap::ArgAction::Append)]
    pub files: Vec<PathBuf>,

    /// Folder whose contents are included (can be used multiple times)
    #[arg(short = 'd', long = "folder", action = clap::ArgAction::Append)]
    pub folders: Vec<PathBuf>,
}

pub fn execute(args: PublishArgs, ctx: &Context) -> Result<i32> {
    if args.files.is_empty() && args.folders.is_empty() {
        bail!("Nothing to publish. Pass at least one --file or --folder.");
    }

    let mut publisher = ctx.publisher(&args.name, &args.version)?;
    let spinner = progress::spinner(&format!(
        "Publishing {} {}...",
        style(&args.name).white().bold(),
        args.version
    ));

    publisher
        .login()
        .context("Failed to log in to the outgoing mail server")?;

    publisher.attach_files(&args.files)?;
    let mut count = args.files.len();
    for folder in &args.folders {
        count += publisher.attach_folder(folder)?;
    }

    spinner.set_message(format!("Sending {} files...", count));
    publisher.send().context("Failed to send the project")?;
    spinner.finish_and_clear();

    println!(
        "{} Published {} {} ({} files)",
        style("Success:").green().bold(),
        args.name,
        args.version,
        count
    );
    Ok(0)
}
