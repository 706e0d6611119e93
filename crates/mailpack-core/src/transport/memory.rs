//! In-process mailbox implementing both transport traits.
//!
//! Clones share the same message store, so a publisher and a downloader
//! built from clones of one `MemoryMailbox` see each other's messages.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{InboundTransport, MessageId, OutboundTransport};
use crate::{MailpackError, Result};

#[derive(Debug, Default)]
struct Store {
    password: Option<String>,
    messages: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryMailbox {
    store: Arc<Mutex<Store>>,
    logged_in: bool,
    selected: bool,
}

impl MemoryMailbox {
    /// A mailbox accepting any password.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailbox that only accepts `password` at login.
    pub fn with_password(password: impl Into<String>) -> Self {
        let mailbox = Self::default();
        mailbox.lock().password = Some(password.into());
        mailbox
    }

    /// Append a raw message as if it had been delivered.
    pub fn deliver(&self, message: impl Into<Vec<u8>>) -> MessageId {
        let mut store = self.lock();
        store.messages.push(message.into());
        store.messages.len() as MessageId
    }

    pub fn len(&self) -> usize {
        self.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn message(&self, id: MessageId) -> Option<Vec<u8>> {
        let index = (id as usize).checked_sub(1)?;
        self.lock().messages.get(index).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // A panic while holding the lock cannot leave the Vec half-written
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn authenticate(&mut self, secret: &str) -> Result<()> {
        let accepted = match &self.lock().password {
            Some(password) => password == secret,
            None => true,
        };
        if !accepted {
            return Err(MailpackError::transport("login", "authentication failed"));
        }
        self.logged_in = true;
        Ok(())
    }

    fn require_login(&self, operation: &'static str) -> Result<()> {
        if self.logged_in {
            Ok(())
        } else {
            Err(MailpackError::transport(operation, "not authenticated"))
        }
    }

    fn require_selected(&self, operation: &'static str) -> Result<()> {
        self.require_login(operation)?;
        if self.selected {
            Ok(())
        } else {
            Err(MailpackError::transport(operation, "no folder selected"))
        }
    }
}

impl OutboundTransport for MemoryMailbox {
    fn login(&mut self, _user: &str, secret: &str) -> Result<()> {
        self.authenticate(secret)
    }

    fn send(&mut self, _from: &str, _to: &str, message: &[u8]) -> Result<()> {
        self.require_login("send")?;
        self.deliver(message.to_vec());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.logged_in = false;
        Ok(())
    }
}

impl InboundTransport for MemoryMailbox {
    fn login(&mut self, _user: &str, secret: &str) -> Result<()> {
        self.authenticate(secret)
    }

    fn select(&mut self, _folder: &str) -> Result<()> {
        self.require_login("select")?;
        self.selected = true;
        Ok(())
    }

    fn search_all(&mut self) -> Result<Vec<MessageId>> {
        self.require_selected("search")?;
        Ok((1..=self.len() as MessageId).collect())
    }

    fn fetch_header(&mut self, id: MessageId) -> Result<Option<Vec<u8>>> {
        self.require_selected("fetch")?;
        let message = self
            .message(id)
            .ok_or_else(|| MailpackError::transport("fetch", format!("no message {}", id)))?;
        let end = message
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map(|p| p + 4)
            .unwrap_or(message.len());
        Ok(Some(message[..end].to_vec()))
    }

    fn fetch_message(&mut self, id: MessageId) -> Result<Vec<u8>> {
        self.require_selected("fetch")?;
        self.message(id)
            .ok_or_else(|| MailpackError::transport("fetch", format!("no message {}", id)))
    }

    fn logout(&mut self) -> Result<()> {
        self.logged_in = false;
        self.selected = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_messages() {
        let mut outbound = MemoryMailbox::new();
        let mut inbound = outbound.clone();

        OutboundTransport::login(&mut outbound, "box@example.org", "pw").unwrap();
        outbound.send("a", "a", b"Subject: x\r\n\r\nbody").unwrap();

        InboundTransport::login(&mut inbound, "box@example.org", "pw").unwrap();
        inbound.select("INBOX").unwrap();
        assert_eq!(inbound.search_all().unwrap(), vec![1]);
        assert_eq!(
            inbound.fetch_header(1).unwrap().unwrap(),
            b"Subject: x\r\n\r\n".to_vec()
        );
    }

    #[test]
    fn test_password_is_checked() {
        let mut mailbox = MemoryMailbox::with_password("hunter2");
        assert!(InboundTransport::login(&mut mailbox, "u", "wrong").is_err());
        assert!(InboundTransport::login(&mut mailbox, "u", "hunter2").is_ok());
    }

    #[test]
    fn test_requires_login_and_select() {
        let mut mailbox = MemoryMailbox::new();
        assert!(mailbox.search_all().is_err());
        InboundTransport::login(&mut mailbox, "u", "p").unwrap();
        assert!(mailbox.search_all().is_err());
        mailbox.select("INBOX").unwrap();
        assert!(mailbox.search_all().unwrap().is_empty());
    }
}
