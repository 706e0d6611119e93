//! Shared command state: effective config and credential resolution.

use anyhow::{bail, Context as _, Result};
use dialoguer::Password;
use std::io::IsTerminal;
use std::path::Path;

use mailpack_core::{
    Account, Config, ConfigLoader, CredentialStore, Downloader, FileCredentialStore, ImapInbound,
    Publisher, SmtpOutbound,
};

/// Environment variable holding a credential token
pub const TOKEN_ENV: &str = "MAILPACK_TOKEN";

pub struct Context {
    pub config: Config,
    loader: ConfigLoader,
    token: Option<String>,
}

impl Context {
    pub fn load(explicit: Option<&Path>, token: Option<String>) -> Result<Self> {
        let working_dir =
            std::env::current_dir().context("Failed to resolve working directory")?;
        let loader = ConfigLoader::new(true);
        let config = Config::build(&working_dir, explicit, &loader)?;

        Ok(Self {
            config,
            loader,
            token,
        })
    }

    pub fn credential_store(&self) -> FileCredentialStore {
        FileCredentialStore::new(self.loader.get_credential_path())
    }

    /// Token from `--token`, then the environment, then the cache.
    pub fn stored_token(&self) -> Result<Option<String>> {
        if let Some(token) = &self.token {
            return Ok(Some(token.clone()));
        }
        if let Some(token) = self.loader.get_env(TOKEN_ENV) {
            return Ok(Some(token));
        }
        Ok(self.credential_store().get()?)
    }

    /// Like [`stored_token`](Self::stored_token), prompting as a last resort.
    pub fn resolve_token(&self) -> Result<String> {
        if let Some(token) = self.stored_token()? {
            return Ok(token);
        }
        prompt_token()
    }

    pub fn account(&self) -> Result<Account> {
        self.config.validate_mailbox()?;
        let token = self.resolve_token()?;
        self.account_for(&token)
    }

    pub fn account_for(&self, token: &str) -> Result<Account> {
        Ok(self.config.account_from_token(token)?)
    }

    pub fn publisher(&self, name: &str, version: &str) -> Result<Publisher<SmtpOutbound>> {
        let account = self.account()?;
        let transport = SmtpOutbound::new(self.config.smtp.host.clone(), self.config.smtp.port);
        Ok(Publisher::new(
            account,
            transport,
            name,
            version,
            self.config.temp_dir.as_deref(),
        )?)
    }

    pub fn downloader(&self) -> Result<Downloader<ImapInbound>> {
        let account = self.account()?;
        Ok(self.downloader_for(account))
    }

    pub fn downloader_for(&self, account: Account) -> Downloader<ImapInbound> {
        let transport = ImapInbound::new(self.config.imap.host.clone(), self.config.imap.port);
        Downloader::new(
            account,
            transport,
            &self.config.mailbox.folder,
            self.config.install_layout(),
        )
    }
}

pub fn prompt_token() -> Result<String> {
    if !std::io::stdin().is_terminal() {
        bail!(
            "No credential token available. Pass --token, set {} or run `mailpack login --save`.",
            TOKEN_ENV
        );
    }

    let token = Password::new()
        .with_prompt("Credential token")
        .interact()
        .context("Failed to read the credential token")?;
    Ok(token.trim().to_string())
}
