//! Mail transports.
//!
//! Sessions talk to the mailbox through two small traits so that the
//! publish and install flows do not depend on a particular protocol
//! implementation:
//!
//! - [`OutboundTransport`] submits finished messages (SMTP).
//! - [`InboundTransport`] lists and fetches messages from one folder (IMAP).
//!
//! All calls block and are attempted once; failures surface as
//! [`MailpackError::Transport`](crate::MailpackError::Transport).

mod imap;
pub mod memory;
mod smtp;

pub use self::imap::ImapInbound;
pub use memory::MemoryMailbox;
pub use smtp::SmtpOutbound;

use crate::Result;

/// Mailbox-assigned message identifier (an IMAP UID).
pub type MessageId = u32;

/// Outbound side of the mailbox.
pub trait OutboundTransport: Send {
    /// Authenticate with the mailbox address and decoded password.
    fn login(&mut self, user: &str, secret: &str) -> Result<()>;

    /// Submit a rendered message.
    fn send(&mut self, from: &str, to: &str, message: &[u8]) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

/// Inbound side of the mailbox.
pub trait InboundTransport: Send {
    fn login(&mut self, user: &str, secret: &str) -> Result<()>;

    /// Select the folder later calls operate on.
    fn select(&mut self, folder: &str) -> Result<()>;

    /// All message ids of the selected folder in arrival order.
    fn search_all(&mut self) -> Result<Vec<MessageId>>;

    /// Raw header block of a message, `None` when the server returned none.
    fn fetch_header(&mut self, id: MessageId) -> Result<Option<Vec<u8>>>;

    /// Full raw message.
    fn fetch_message(&mut self, id: MessageId) -> Result<Vec<u8>>;

    fn logout(&mut self) -> Result<()>;
}
