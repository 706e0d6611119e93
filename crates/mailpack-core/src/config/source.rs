use std::env;
use std::path::{Path, PathBuf};

/// File searched for upward from the working directory.
pub const CONFIG_FILE_NAME: &str = "mailpack.toml";

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in defaults only
    Default,
    /// Per-user config directory
    Global(PathBuf),
    /// `mailpack.toml` found from the working directory
    Project(PathBuf),
    /// Explicit `--config` path
    Command(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Default => None,
            ConfigSource::Global(p) | ConfigSource::Project(p) | ConfigSource::Command(p) => {
                Some(p)
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConfigSource::Default => "default",
            ConfigSource::Global(_) => "global",
            ConfigSource::Project(_) => "project",
            ConfigSource::Command(_) => "command",
        }
    }
}

/// Resolves directories and environment overrides
#[derive(Debug)]
pub struct ConfigLoader {
    use_environment: bool,
}

impl ConfigLoader {
    pub fn new(use_environment: bool) -> Self {
        Self { use_environment }
    }

    /// Get a MAILPACK_* environment variable
    pub fn get_env(&self, var: &str) -> Option<String> {
        if !self.use_environment {
            return None;
        }

        env::var(var).ok().filter(|s| !s.is_empty())
    }

    /// Get a configuration value from environment variable
    /// Converts "smtp-host" to "MAILPACK_SMTP_HOST"
    pub fn get_env_config(&self, key: &str) -> Option<String> {
        let env_var = format!("MAILPACK_{}", key.replace('-', "_").to_uppercase());
        self.get_env(&env_var)
    }

    /// Get unsigned integer value from environment variable
    pub fn get_env_u64(&self, key: &str) -> Option<u64> {
        self.get_env_config(key).and_then(|val| val.parse().ok())
    }

    /// Get port value from environment variable
    pub fn get_env_u16(&self, key: &str) -> Option<u16> {
        self.get_env_config(key).and_then(|val| val.parse().ok())
    }

    /// Get a path value from environment variable
    pub fn get_env_path(&self, key: &str) -> Option<PathBuf> {
        self.get_env_config(key).map(PathBuf::from)
    }

    /// Get the mailpack home directory (config and cached credential)
    pub fn get_home(&self) -> PathBuf {
        if let Some(home) = self.get_env("MAILPACK_HOME") {
            return PathBuf::from(home);
        }

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "mailpack") {
            proj_dirs.config_dir().to_path_buf()
        } else if let Some(base) = directories::BaseDirs::new() {
            base.home_dir().join(".mailpack")
        } else {
            PathBuf::from(".mailpack")
        }
    }

    /// Default install root when none is configured
    pub fn get_default_install_root(&self) -> PathBuf {
        if let Some(home) = self.get_env("MAILPACK_HOME") {
            return PathBuf::from(home).join("projects");
        }

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "mailpack") {
            proj_dirs.data_dir().join("projects")
        } else {
            self.get_home().join("projects")
        }
    }

    /// Per-user config file
    pub fn get_global_config_path(&self) -> PathBuf {
        self.get_home().join("config.toml")
    }

    /// File holding the cached credential token
    pub fn get_credential_path(&self) -> PathBuf {
        self.get_home().join("credential.json")
    }

    /// Search `start_dir` and its parents for `mailpack.toml`
    pub fn find_project_config(&self, start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}
