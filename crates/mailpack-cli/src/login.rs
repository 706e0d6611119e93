//! Login and logout commands - verify and cache the credential token.

use anyhow::{Context as _, Result};
use clap::Args;
use console::style;
use mailpack_core::CredentialStore;

use crate::context::Context;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Cache the token after a successful login
    #[arg(short, long)]
    pub save: bool,
}

pub fn execute(args: LoginArgs, ctx: &Context) -> Result<i32> {
    ctx.config.validate_mailbox()?;
    let token = ctx.resolve_token()?;
    let account = ctx.account_for(&token)?;
    let address = account.address.clone();

    let mut downloader = ctx.downloader_for(account);
    downloader
        .login()
        .with_context(|| format!("Login to {} failed, the token may have expired", address))?;
    downloader.close()?;

    println!("{} Logged in to {}", style("Success:").green().bold(), address);

    if args.save {
        let store = ctx.credential_store();
        store.set(&token)?;
        println!(
            "{} Token cached in {}",
            style("Info:").cyan(),
            store.path().display()
        );
    }

    Ok(0)
}

pub fn logout(ctx: &Context) -> Result<i32> {
    let store = ctx.credential_store();
    if store.get()?.is_none() {
        println!("{} No cached token", style("Info:").cyan());
        return Ok(0);
    }

    store.clear()?;
    println!("{} Removed cached token", style("Success:").green().bold());
    Ok(0)
}
