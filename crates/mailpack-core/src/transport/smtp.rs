//! SMTP submission over implicit TLS.

use lettre::address::{Address, Envelope};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};

use super::OutboundTransport;
use crate::{MailpackError, Result};

/// Outbound transport backed by `lettre`'s blocking SMTP client.
pub struct SmtpOutbound {
    host: String,
    port: u16,
    transport: Option<SmtpTransport>,
}

impl SmtpOutbound {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            transport: None,
        }
    }
}

fn parse_address(address: &str) -> Result<Address> {
    address
        .parse()
        .map_err(|e| MailpackError::Config(format!("Invalid mailbox address \"{}\": {}", address, e)))
}

impl OutboundTransport for SmtpOutbound {
    fn login(&mut self, user: &str, secret: &str) -> Result<()> {
        log::debug!("Connecting to SMTP server {}:{}", self.host, self.port);
        let transport = SmtpTransport::relay(&self.host)
            .map_err(|e| MailpackError::transport("login", e))?
            .port(self.port)
            .credentials(Credentials::new(user.to_string(), secret.to_string()))
            .build();

        // Connecting authenticates with the credentials above
        let connected = transport
            .test_connection()
            .map_err(|e| MailpackError::transport("login", e))?;
        if !connected {
            return Err(MailpackError::transport("login", "server did not accept the connection"));
        }

        self.transport = Some(transport);
        Ok(())
    }

    fn send(&mut self, from: &str, to: &str, message: &[u8]) -> Result<()> {
        let transport = self.transport.as_ref().ok_or_else(|| {
            MailpackError::InvalidState("SMTP transport is not logged in.".to_string())
        })?;
        let envelope = Envelope::new(Some(parse_address(from)?), vec![parse_address(to)?])
            .map_err(|e| MailpackError::transport("send", e))?;

        transport
            .send_raw(&envelope, message)
            .map_err(|e| MailpackError::transport("send", e))?;
        log::debug!("Sent {} bytes to {}", message.len(), to);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the transport closes its pooled connections
        self.transport = None;
        Ok(())
    }
}
