//! Install command - fetch project versions on a worker thread and install them.

use anyhow::{bail, Context as _, Result};
use clap::Args;
use console::style;
use indicatif::ProgressBar;
use std::path::PathBuf;

use mailpack_core::{spawn_install, InboundTransport, InstallHandle, InstallRequest, ProgressEvent};

use crate::context::Context;
use crate::progress;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Pairs of project name and version, e.g. `demo 1.0 tools 2.1`
    #[arg(value_name = "NAME VERSION", required = true, num_args = 2..)]
    pub projects: Vec<String>,

    /// Fail instead of replacing projects that are already installed
    #[arg(long)]
    pub no_overwrite: bool,
}

/// Split `name version name version ...` into install requests.
pub fn parse_requests(args: &[String]) -> Result<Vec<InstallRequest>> {
    if args.len() % 2 != 0 {
        bail!(
            "Expected pairs of project name and version, got {} values",
            args.len()
        );
    }

    Ok(args
        .chunks(2)
        .map(|pair| InstallRequest::new(pair[0].as_str(), pair[1].as_str()))
        .collect())
}

pub fn execute(args: InstallArgs, ctx: &Context) -> Result<i32> {
    let requests = parse_requests(&args.projects)?;

    let mut downloader = ctx.downloader()?;
    downloader
        .login()
        .context("Failed to log in to the incoming mail server")?;

    let spinner = progress::spinner("Connecting...");
    let handle = spawn_install(downloader, requests, !args.no_overwrite);
    let result = wait_for_install(handle, &spinner);
    spinner.finish_and_clear();

    let root = result?;
    println!(
        "{} Installed into {}",
        style("Success:").green().bold(),
        root.display()
    );
    Ok(0)
}

/// Render worker progress until the batch ends, then close the session.
///
/// The install result wins over a failing logout, which is only logged.
pub fn wait_for_install<T: InboundTransport>(
    handle: InstallHandle<T>,
    spinner: &ProgressBar,
) -> Result<PathBuf> {
    for event in handle.events().iter() {
        match event {
            ProgressEvent::Message(message) => {
                log::debug!("{}", message);
                spinner.set_message(message);
            }
            ProgressEvent::Finished(_) | ProgressEvent::Failed(_) => break,
        }
    }

    let (mut downloader, outcome) = handle.join()?;
    if let Err(e) = downloader.close() {
        log::warn!("Failed to close the mail session: {}", e);
    }
    Ok(outcome?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailpack_core::{
        Account, Downloader, InstallLayout, MailpackError, MemoryMailbox, MessageId,
    };
    use tempfile::TempDir;

    /// Memory mailbox whose logout always fails.
    struct FailingLogout(MemoryMailbox);

    impl InboundTransport for FailingLogout {
        fn login(&mut self, user: &str, secret: &str) -> mailpack_core::Result<()> {
            InboundTransport::login(&mut self.0, user, secret)
        }
        fn select(&mut self, folder: &str) -> mailpack_core::Result<()> {
            self.0.select(folder)
        }
        fn search_all(&mut self) -> mailpack_core::Result<Vec<MessageId>> {
            self.0.search_all()
        }
        fn fetch_header(&mut self, id: MessageId) -> mailpack_core::Result<Option<Vec<u8>>> {
            self.0.fetch_header(id)
        }
        fn fetch_message(&mut self, id: MessageId) -> mailpack_core::Result<Vec<u8>> {
            self.0.fetch_message(id)
        }
        fn logout(&mut self) -> mailpack_core::Result<()> {
            Err(MailpackError::InvalidState("logout refused".to_string()))
        }
    }

    #[test]
    fn test_install_error_survives_failing_logout() {
        let root = TempDir::new().unwrap();
        let mut downloader = Downloader::new(
            Account::new("box@example.org", "pw"),
            FailingLogout(MemoryMailbox::new()),
            "INBOX",
            InstallLayout::new(root.path(), "-", "main.py"),
        );
        downloader.login().unwrap();

        let handle = spawn_install(downloader, vec![InstallRequest::new("Ghost", "0.1")], true);
        let err = wait_for_install(handle, &ProgressBar::hidden()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MailpackError>(),
            Some(MailpackError::NotFound(_))
        ));
        assert!(err.to_string().contains("Ghost"));
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_requests() {
        let requests = parse_requests(&strings(&["demo", "1.0", "tools", "2.1"])).unwrap();
        assert_eq!(
            requests,
            vec![
                InstallRequest::new("demo", "1.0"),
                InstallRequest::new("tools", "2.1"),
            ]
        );
    }

    #[test]
    fn test_parse_requests_odd_count() {
        assert!(parse_requests(&strings(&["demo", "1.0", "tools"])).is_err());
    }
}
