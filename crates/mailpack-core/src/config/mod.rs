//! Configuration for mailpack.
//!
//! # Configuration Sources (in priority order, highest to lowest)
//!
//! 1. Environment variables (`MAILPACK_*`)
//! 2. `mailpack.toml` in the working directory or one of its parents
//! 3. `config.toml` in the per-user config directory
//! 4. Built-in defaults
//!
//! # Example
//!
//! ```toml
//! [mailbox]
//! address = "packages@example.org"
//! folder = "INBOX"
//!
//! [smtp]
//! host = "smtp.example.org"
//! port = 465
//!
//! [imap]
//! host = "imap.example.org"
//! port = 993
//!
//! [token]
//! key = "shared obfuscation key"
//! life = 604800
//!
//! [install]
//! root = "/home/me/projects"
//! separator = "-"
//! run-file = "main.py"
//! interpreter = "python"
//! ```

mod config;
mod credential;
mod source;

pub use config::{Config, ImapConfig, InstallConfig, MailboxConfig, SmtpConfig, TokenConfig};
pub use credential::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use source::{ConfigLoader, ConfigSource, CONFIG_FILE_NAME};
