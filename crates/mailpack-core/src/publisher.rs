//! Publishing a project archive to the mailbox.

use std::path::{Path, PathBuf};

use crate::account::Account;
use crate::archive::ArchiveBundle;
use crate::message::TaggedEnvelope;
use crate::session::SessionState;
use crate::transport::OutboundTransport;
use crate::Result;

/// One publish session: bundle files, then send them as a tagged message.
///
/// ```text
/// new -> login -> attach_* ... -> send
/// ```
///
/// Temporary storage is removed by `send`, `close`, or on drop.
pub struct Publisher<T: OutboundTransport> {
    account: Account,
    transport: T,
    envelope: TaggedEnvelope,
    bundle: ArchiveBundle,
    state: SessionState,
}

impl<T: OutboundTransport> Publisher<T> {
    /// Prepare a message tagging `subject` at `version`.
    pub fn new(
        account: Account,
        transport: T,
        subject: &str,
        version: &str,
        temp_root: Option<&Path>,
    ) -> Result<Self> {
        let bundle = ArchiveBundle::new(&format!("{}.zip", subject), temp_root)?;
        let envelope = TaggedEnvelope::new(&account.address, subject, version);

        Ok(Self {
            account,
            transport,
            envelope,
            bundle,
            state: SessionState::Idle,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn envelope(&self) -> &TaggedEnvelope {
        &self.envelope
    }

    pub fn login(&mut self) -> Result<()> {
        self.state.require_open("Publisher")?;
        if self.state == SessionState::LoggedIn {
            return Ok(());
        }

        self.transport.login(&self.account.address, self.account.secret())?;
        self.state = SessionState::LoggedIn;
        log::info!("Logged in to {} for publishing", self.account.address);
        Ok(())
    }

    pub fn attach_file(&mut self, path: &Path) -> Result<()> {
        self.state.require_logged_in("Publisher")?;
        self.bundle.attach_file(path)
    }

    pub fn attach_files(&mut self, paths: &[PathBuf]) -> Result<()> {
        self.state.require_logged_in("Publisher")?;
        for path in paths {
            self.bundle.attach_file(path)?;
        }
        Ok(())
    }

    /// Returns the number of files added.
    pub fn attach_folder(&mut self, path: &Path) -> Result<usize> {
        self.state.require_logged_in("Publisher")?;
        self.bundle.attach_folder(path)
    }

    /// Send the bundle to the mailbox and close the session.
    pub fn send(&mut self) -> Result<()> {
        self.state.require_logged_in("Publisher")?;

        let data = self.bundle.finalize()?;
        let size = data.len();
        let message = self
            .envelope
            .render(Some((self.bundle.file_name(), data)))?;

        let address = &self.account.address;
        self.transport.send(address, address, &message)?;
        log::info!(
            "Published {} {} ({} bytes)",
            self.envelope.project_name,
            self.envelope.project_version,
            size
        );

        self.close()
    }

    /// Release temporary storage and the transport. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        match self.state {
            SessionState::Closed => return Ok(()),
            SessionState::Idle => {
                self.state = SessionState::Closed;
                self.bundle.clear()?;
            }
            SessionState::LoggedIn => {
                self.state = SessionState::Closed;
                self.bundle.clear()?;
                self.transport.close()?;
            }
        }
        Ok(())
    }
}

impl<T: OutboundTransport> Drop for Publisher<T> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Failed to close publisher: {}", e);
        }
    }
}
