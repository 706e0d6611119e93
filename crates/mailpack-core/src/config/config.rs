use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::source::{ConfigLoader, ConfigSource};
use crate::account::Account;
use crate::error::{MailpackError, Result};
use crate::project::InstallLayout;

/// The shared service mailbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MailboxConfig {
    /// Address packages are sent from and to
    pub address: String,
    /// Folder scanned for package messages
    pub folder: String,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            folder: "INBOX".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 465,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImapConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ImapConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 993,
        }
    }
}

/// Credential token parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Obfuscation key shared by publisher and consumers
    pub key: String,
    /// Validity window in seconds
    pub life: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            key: "mailpack".to_string(),
            life: 7 * 24 * 60 * 60,
        }
    }
}

/// Where and how projects are installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InstallConfig {
    /// Install root; a per-user data directory when unset
    pub root: Option<PathBuf>,
    /// Joins project name and version in directory names
    pub separator: String,
    /// Entry-point file that makes a project runnable
    pub run_file: String,
    /// Program used to start the entry-point file
    pub interpreter: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            root: None,
            separator: "-".to_string(),
            run_file: "main.py".to_string(),
            interpreter: "python".to_string(),
        }
    }
}

/// Complete mailpack configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub mailbox: MailboxConfig,
    pub smtp: SmtpConfig,
    pub imap: ImapConfig,
    pub token: TokenConfig,
    pub install: InstallConfig,
    /// Parent directory for temporary archive bundles
    pub temp_dir: Option<PathBuf>,

    #[serde(skip)]
    source: Option<ConfigSource>,
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| MailpackError::Config(e.to_string()))
    }

    /// Load a specific config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| MailpackError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
            .map_err(|e| MailpackError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Build the effective configuration.
    ///
    /// `explicit` wins over the project file found from `working_dir`, which
    /// wins over the per-user file. Environment overrides apply last.
    pub fn build(working_dir: &Path, explicit: Option<&Path>, loader: &ConfigLoader) -> Result<Self> {
        let (mut config, source) = if let Some(path) = explicit {
            (Self::from_file(path)?, ConfigSource::Command(path.to_path_buf()))
        } else if let Some(path) = loader.find_project_config(working_dir) {
            (Self::from_file(&path)?, ConfigSource::Project(path))
        } else {
            let global = loader.get_global_config_path();
            if global.is_file() {
                (Self::from_file(&global)?, ConfigSource::Global(global))
            } else {
                (Self::default(), ConfigSource::Default)
            }
        };

        log::debug!("Using {} configuration {:?}", source.as_str(), source.path());
        config.source = Some(source);
        config.apply_env(loader);

        if config.install.root.is_none() {
            config.install.root = Some(loader.get_default_install_root());
        }

        Ok(config)
    }

    /// Apply MAILPACK_* overrides
    pub fn apply_env(&mut self, loader: &ConfigLoader) {
        if let Some(v) = loader.get_env_config("address") {
            self.mailbox.address = v;
        }
        if let Some(v) = loader.get_env_config("folder") {
            self.mailbox.folder = v;
        }
        if let Some(v) = loader.get_env_config("smtp-host") {
            self.smtp.host = v;
        }
        if let Some(v) = loader.get_env_u16("smtp-port") {
            self.smtp.port = v;
        }
        if let Some(v) = loader.get_env_config("imap-host") {
            self.imap.host = v;
        }
        if let Some(v) = loader.get_env_u16("imap-port") {
            self.imap.port = v;
        }
        if let Some(v) = loader.get_env_config("token-key") {
            self.token.key = v;
        }
        if let Some(v) = loader.get_env_u64("token-life") {
            self.token.life = v;
        }
        if let Some(v) = loader.get_env_path("install-root") {
            self.install.root = Some(v);
        }
    }

    pub fn source(&self) -> Option<&ConfigSource> {
        self.source.as_ref()
    }

    /// Install layout, falling back to `./projects` when no root is set
    pub fn install_layout(&self) -> InstallLayout {
        let root = self
            .install
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from("projects"));
        InstallLayout::new(root, self.install.separator.clone(), self.install.run_file.clone())
    }

    /// Check the settings needed to reach the mailbox
    pub fn validate_mailbox(&self) -> Result<()> {
        if self.mailbox.address.trim().is_empty() {
            return Err(MailpackError::Config("mailbox address is not configured".to_string()));
        }
        if self.smtp.host.trim().is_empty() {
            return Err(MailpackError::Config("smtp host is not configured".to_string()));
        }
        if self.imap.host.trim().is_empty() {
            return Err(MailpackError::Config("imap host is not configured".to_string()));
        }
        Ok(())
    }

    /// Decode a credential token into an account for the configured mailbox
    pub fn account_from_token(&self, token: &str) -> Result<Account> {
        Account::from_token(self.mailbox.address.clone(), token, &self.token.key)
    }

    /// Mint a credential token for `secret` with the configured key and life
    pub fn encode_token(&self, secret: &str, life: Option<u64>) -> Result<String> {
        Ok(mailpack_token::encode(secret, &self.token.key, life.unwrap_or(self.token.life))?)
    }
}
