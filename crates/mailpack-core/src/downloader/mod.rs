//! Discovering, fetching and installing published projects.
//!
//! A [`Downloader`] owns one inbound mail session. Discovery reads only
//! message headers; a fetch pulls the full message of the most recent
//! match and queues its archive; `install` materializes every queued
//! archive under the install root.

mod catalog;
mod worker;

pub use catalog::Catalog;
pub use worker::{spawn_install, InstallHandle, InstallOutcome, InstallRequest};

use std::fs;
use std::path::PathBuf;

use crate::account::Account;
use crate::archive::ArchiveExtractor;
use crate::message::{HeaderView, ProjectArchiveInfo};
use crate::progress::ProgressSink;
use crate::project::InstallLayout;
use crate::session::SessionState;
use crate::transport::{InboundTransport, MessageId};
use crate::{MailpackError, Result};

pub struct Downloader<T: InboundTransport> {
    account: Account,
    folder: String,
    transport: T,
    layout: InstallLayout,
    pending: Vec<ProjectArchiveInfo>,
    state: SessionState,
}

impl<T: InboundTransport> Downloader<T> {
    pub fn new(account: Account, transport: T, folder: &str, layout: InstallLayout) -> Self {
        Self {
            account,
            folder: folder.to_string(),
            transport,
            layout,
            pending: Vec::new(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Archives fetched but not yet installed.
    pub fn pending(&self) -> &[ProjectArchiveInfo] {
        &self.pending
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Authenticate and select the monitored folder.
    pub fn login(&mut self) -> Result<()> {
        self.state.require_open("Downloader")?;
        if self.state == SessionState::LoggedIn {
            return Ok(());
        }

        self.transport.login(&self.account.address, self.account.secret())?;
        self.state = SessionState::LoggedIn;
        self.transport.select(&self.folder)?;
        log::info!("Logged in to {} ({})", self.account.address, self.folder);
        Ok(())
    }

    /// Every message id in the folder, most recent first.
    pub fn list_all_message_ids(&mut self) -> Result<Vec<MessageId>> {
        self.state.require_logged_in("Downloader")?;
        let mut ids = self.transport.search_all()?;
        ids.reverse();
        Ok(ids)
    }

    /// Build a fresh catalog of package messages from their headers.
    pub fn discover(&mut self) -> Result<Catalog> {
        let ids = self.list_all_message_ids()?;
        let mut catalog = Catalog::new();

        for id in ids {
            let header = match self.transport.fetch_header(id)? {
                Some(header) => header,
                None => {
                    log::debug!("Message {} returned no header", id);
                    continue;
                }
            };
            match HeaderView::parse(&header) {
                Some(view) => catalog.insert(id, view),
                None => log::trace!("Message {} is not a package message", id),
            }
        }

        log::debug!("Discovered {} package messages", catalog.len());
        Ok(catalog)
    }

    /// Most recent message tagged with `name` at `version`.
    pub fn find_match(&mut self, name: &str, version: &str) -> Result<Option<MessageId>> {
        Ok(self.discover()?.find(name, version))
    }

    /// Fetch the archive of `name` at `version` and queue it for install.
    pub fn fetch(&mut self, name: &str, version: &str) -> Result<()> {
        if name.is_empty() {
            return Err(MailpackError::NotFound("Project name can not be empty.".to_string()));
        }
        self.state.require_logged_in("Downloader")?;

        let id = self.find_match(name, version)?.ok_or_else(|| {
            MailpackError::NotFound(format!("Can not find the email whose name is {}.", name))
        })?;

        let raw = self.transport.fetch_message(id)?;
        let info = ProjectArchiveInfo::from_message(&raw)?.ok_or_else(|| {
            MailpackError::NotFound(format!(
                "The email of {} {} carries no archive.",
                name, version
            ))
        })?;

        log::info!(
            "Fetched {} {} from message {} ({} bytes)",
            info.project_name,
            info.version,
            id,
            info.data.len()
        );
        self.pending.push(info);
        Ok(())
    }

    /// Install every pending archive and return the install root.
    ///
    /// An existing project directory is replaced when `overwrite` is set;
    /// otherwise the batch stops with `AlreadyExists`, keeping the projects
    /// installed before it. The pending list is emptied either way.
    ///
    /// Works without a live login since pending archives are already in
    /// memory, but not after `close`.
    pub fn install(&mut self, overwrite: bool, progress: &dyn ProgressSink) -> Result<PathBuf> {
        self.state.require_open("Downloader")?;
        let pending = std::mem::take(&mut self.pending);
        let root = self.layout.root.clone();
        fs::create_dir_all(&root)?;

        for info in pending {
            let dir_name = self.layout.dir_name(&info.project_name, &info.version);
            let target = root.join(&dir_name);

            if target.exists() {
                if overwrite {
                    progress.report(format!("\"{}\" exists, uninstalling it...", dir_name));
                    fs::remove_dir_all(&target)?;
                    progress.report(format!("Uninstalling \"{}\" successfully.", dir_name));
                } else {
                    progress.report(format!("Failed to install \"{}\".", dir_name));
                    return Err(MailpackError::AlreadyExists(format!(
                        "\"{}\" already exists. Consider turning overwrite on.",
                        dir_name
                    )));
                }
            }

            progress.report(format!("Installing \"{}\"...", dir_name));
            ArchiveExtractor::extract_all(&info.data, &info.file_name, &root, Some(&dir_name))?;
            progress.report(format!("Installing \"{}\" successfully!", dir_name));
            log::info!("Installed {}", target.display());
        }

        Ok(root)
    }

    /// Drop pending archives and log out. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        self.pending.clear();
        let was_logged_in = self.state == SessionState::LoggedIn;
        self.state = SessionState::Closed;
        if was_logged_in {
            self.transport.logout()?;
        }
        Ok(())
    }
}

impl<T: InboundTransport> Drop for Downloader<T> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Failed to close downloader: {}", e);
        }
    }
}
