//! Publish and install versioned project archives through a shared mailbox.
//!
//! A publisher zips files into an [`ArchiveBundle`] and mails it to the
//! service mailbox, tagged with `project-name` and `project-version`
//! headers. Consumers scan the mailbox with a [`Downloader`], fetch the
//! most recent message for a (name, version) pair and extract it to
//! `<install root>/<name><separator><version>`.

pub mod account;
pub mod archive;
pub mod config;
pub mod downloader;
pub mod error;
pub mod launcher;
pub mod message;
pub mod progress;
pub mod project;
pub mod publisher;
pub mod session;
pub mod transport;

pub use account::Account;
pub use archive::{ArchiveBundle, ArchiveExtractor};
pub use config::{Config, ConfigLoader, CredentialStore, FileCredentialStore};
pub use downloader::{
    spawn_install, Catalog, Downloader, InstallHandle, InstallOutcome, InstallRequest,
};
pub use error::{MailpackError, Result};
pub use launcher::Launcher;
pub use message::{HeaderView, ProjectArchiveInfo, TaggedEnvelope};
pub use progress::{NoProgress, ProgressEvent, ProgressSink};
pub use project::InstallLayout;
pub use publisher::Publisher;
pub use session::SessionState;
pub use transport::{ImapInbound, InboundTransport, MemoryMailbox, MessageId, OutboundTransport, SmtpOutbound};
