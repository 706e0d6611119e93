mod context;
mod install;
mod list;
mod login;
mod progress;
mod publish;
mod remove;
mod run;
mod token;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use context::Context;

#[derive(Parser, Debug)]
#[command(name = "mailpack")]
#[command(about = "Publish and install project archives through a shared mailbox")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of searching for mailpack.toml
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Credential token (overrides MAILPACK_TOKEN and the cached token)
    #[arg(long, global = true, value_name = "TOKEN")]
    token: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or inspect credential tokens
    Token {
        #[command(subcommand)]
        command: token::TokenCommands,
    },

    /// Verify a credential token against the mailbox
    Login(login::LoginArgs),

    /// Forget the cached credential token
    Logout,

    /// Publish files and folders as a project version
    Publish(publish::PublishArgs),

    /// List projects published to the mailbox
    List(list::ListArgs),

    /// Download and install project versions
    Install(install::InstallArgs),

    /// Uninstall a project version
    Remove(remove::RemoveArgs),

    /// Run an installed project
    Run(run::RunArgs),
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run() -> Result<i32> {
    let args = Args::parse();
    init_logger(args.verbose);

    let ctx = Context::load(args.config.as_deref(), args.token)?;

    match args.command {
        Commands::Token { command } => token::execute(command, &ctx),
        Commands::Login(login_args) => login::execute(login_args, &ctx),
        Commands::Logout => login::logout(&ctx),
        Commands::Publish(publish_args) => publish::execute(publish_args, &ctx),
        Commands::List(list_args) => list::execute(list_args, &ctx),
        Commands::Install(install_args) => install::execute(install_args, &ctx),
        Commands::Remove(remove_args) => remove::execute(remove_args, &ctx),
        Commands::Run(run_args) => run::execute(run_args, &ctx),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("{} {}", console::style("Error:").red().bold(), e);
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}
