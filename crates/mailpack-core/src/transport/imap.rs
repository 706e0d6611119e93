//! IMAP access over TLS.

use std::net::TcpStream;

use native_tls::{TlsConnector, TlsStream};

use super::{InboundTransport, MessageId};
use crate::{MailpackError, Result};

type ImapSession = imap::Session<TlsStream<TcpStream>>;

/// Inbound transport backed by the `imap` crate.
///
/// Message ids are UIDs so they stay valid while other clients expunge.
pub struct ImapInbound {
    host: String,
    port: u16,
    session: Option<ImapSession>,
}

impl ImapInbound {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            session: None,
        }
    }

    fn session(&mut self) -> Result<&mut ImapSession> {
        self.session.as_mut().ok_or_else(|| {
            MailpackError::InvalidState("IMAP transport is not logged in.".to_string())
        })
    }
}

impl InboundTransport for ImapInbound {
    fn login(&mut self, user: &str, secret: &str) -> Result<()> {
        log::debug!("Connecting to IMAP server {}:{}", self.host, self.port);
        let tls = TlsConnector::builder()
            .build()
            .map_err(|e| MailpackError::transport("login", e))?;
        let client = imap::connect((self.host.as_str(), self.port), self.host.as_str(), &tls)
            .map_err(|e| MailpackError::transport("login", e))?;
        let session = client
            .login(user, secret)
            .map_err(|(e, _)| MailpackError::transport("login", e))?;

        self.session = Some(session);
        Ok(())
    }

    fn select(&mut self, folder: &str) -> Result<()> {
        let mailbox = self
            .session()?
            .select(folder)
            .map_err(|e| MailpackError::transport("select", e))?;
        log::debug!("Selected {} ({} messages)", folder, mailbox.exists);
        Ok(())
    }

    fn search_all(&mut self) -> Result<Vec<MessageId>> {
        let uids = self
            .session()?
            .uid_search("ALL")
            .map_err(|e| MailpackError::transport("search", e))?;
        let mut uids: Vec<MessageId> = uids.into_iter().collect();
        uids.sort_unstable();
        Ok(uids)
    }

    fn fetch_header(&mut self, id: MessageId) -> Result<Option<Vec<u8>>> {
        // PEEK keeps discovery from marking messages as read
        let fetches = self
            .session()?
            .uid_fetch(id.to_string(), "BODY.PEEK[HEADER]")
            .map_err(|e| MailpackError::transport("fetch", e))?;
        Ok(fetches
            .iter()
            .next()
            .and_then(|fetch| fetch.header())
            .map(|header| header.to_vec()))
    }

    fn fetch_message(&mut self, id: MessageId) -> Result<Vec<u8>> {
        let fetches = self
            .session()?
            .uid_fetch(id.to_string(), "BODY[]")
            .map_err(|e| MailpackError::transport("fetch", e))?;
        fetches
            .iter()
            .next()
            .and_then(|fetch| fetch.body())
            .map(|body| body.to_vec())
            .ok_or_else(|| MailpackError::transport("fetch", format!("message {} has no body", id)))
    }

    fn logout(&mut self) -> Result<()> {
        if let Some(mut session) = self.session.take() {
            // The folder may never have been selected; closing it is best effort
            if let Err(e) = session.close() {
                log::debug!("IMAP close failed: {}", e);
            }
            session
                .logout()
                .map_err(|e| MailpackError::transport("logout", e))?;
        }
        Ok(())
    }
}
