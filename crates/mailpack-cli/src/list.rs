//! List command - show projects published to the mailbox.

use anyhow::{Context as _, Result};
use clap::Args;
use console::style;

use crate::context::Context;
use crate::progress;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show projects with this name
    pub name: Option<String>,

    /// Show only installed projects, without contacting the mailbox
    #[arg(short, long)]
    pub installed: bool,
}

pub fn execute(args: ListArgs, ctx: &Context) -> Result<i32> {
    if args.installed {
        return list_installed(ctx);
    }

    let mut downloader = ctx.downloader()?;
    let spinner = progress::spinner("Scanning mailbox...");
    downloader
        .login()
        .context("Failed to log in to the incoming mail server")?;
    let catalog = downloader.discover()?;
    downloader.close()?;
    spinner.finish_and_clear();

    let layout = ctx.config.install_layout();
    let projects: Vec<_> = catalog
        .projects()
        .into_iter()
        .filter(|(name, _)| args.name.as_deref().map_or(true, |n| n == name.as_str()))
        .collect();

    if projects.is_empty() {
        println!("{} No projects found", style("Info:").cyan());
        return Ok(0);
    }

    for (name, version) in projects {
        let marker = if layout.project_runnable(&name, &version) {
            style("runnable").green().to_string()
        } else if layout.project_exists(&name, &version) {
            style("installed").yellow().to_string()
        } else {
            String::new()
        };
        println!("  {} {} {}", style(&name).white().bold(), version, marker);
    }
    Ok(0)
}

fn list_installed(ctx: &Context) -> Result<i32> {
    let layout = ctx.config.install_layout();
    let installed = layout.installed()?;

    if installed.is_empty() {
        println!(
            "{} Nothing installed in {}",
            style("Info:").cyan(),
            layout.root().display()
        );
        return Ok(0);
    }

    for dir in installed {
        println!("  {}", style(dir).white().bold());
    }
    Ok(0)
}
