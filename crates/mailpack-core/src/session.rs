//! Lifecycle shared by publisher and downloader sessions.

use crate::{MailpackError, Result};

/// Lifecycle of a mail session: `Idle -> LoggedIn -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    LoggedIn,
    Closed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::LoggedIn => "logged in",
            SessionState::Closed => "closed",
        }
    }

    /// Fail with `InvalidState` unless the session is logged in.
    pub(crate) fn require_logged_in(&self, owner: &str) -> Result<()> {
        if *self == SessionState::LoggedIn {
            Ok(())
        } else {
            Err(MailpackError::InvalidState(format!(
                "This {} is not available now (session is {}).",
                owner,
                self.as_str()
            )))
        }
    }

    pub(crate) fn require_open(&self, owner: &str) -> Result<()> {
        if *self == SessionState::Closed {
            Err(MailpackError::InvalidState(format!(
                "This {} has already been closed.",
                owner
            )))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
