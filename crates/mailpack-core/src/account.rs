//! Mailbox credentials handed to sessions.

use crate::Result;

/// Mailbox address plus the decoded password used to log in.
#[derive(Clone)]
pub struct Account {
    pub address: String,
    secret: String,
}

impl Account {
    pub fn new(address: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            secret: secret.into(),
        }
    }

    /// Decode a credential token with the current clock.
    ///
    /// An expired token still yields an account; the server rejects the
    /// resulting password at login.
    pub fn from_token(address: impl Into<String>, token: &str, key: &str) -> Result<Self> {
        let secret = mailpack_token::decode(token, key)?;
        Ok(Self::new(address, secret))
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("secret", &"<redacted>")
            .finish()
    }
}
