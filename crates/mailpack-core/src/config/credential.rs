//! Cached credential token.
//!
//! Only the time-limited token is ever stored, never the decoded password.
//!
//! ```json
//! { "password": "Yn9kfm94OHwzNjAw" }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{MailpackError, Result};

/// A single-slot store for the credential token.
pub trait CredentialStore {
    fn get(&self) -> Result<Option<String>>;
    fn set(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedCredential {
    password: String,
}

/// JSON file in the user's mailpack home.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let cached: CachedCredential = serde_json::from_str(&contents).map_err(|e| {
            MailpackError::Config(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;
        Ok(Some(cached.password).filter(|p| !p.is_empty()))
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let cached = CachedCredential {
            password: token.to_string(),
        };
        let json = serde_json::to_string_pretty(&cached)
            .map_err(|e| MailpackError::Config(e.to_string()))?;
        fs::write(&self.path, json)?;
        log::info!("Saved credential token to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store, for callers that must not touch the disk.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.token.lock().map(|slot| (*slot).clone()).unwrap_or_default())
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
        Ok(())
    }
}
