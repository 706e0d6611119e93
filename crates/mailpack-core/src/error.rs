use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailpackError {
    // Lifecycle errors
    #[error("{0}")]
    InvalidState(String),

    // Lookup errors
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    // Mail transport errors
    #[error("Mail transport failed during {operation}: {reason}")]
    Transport { operation: &'static str, reason: String },

    // Message format errors
    #[error("Malformed message: {0}")]
    Malformed(String),

    // Archive errors
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Credential errors
    #[error("Invalid credential token: {0}")]
    Token(#[from] mailpack_token::TokenError),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Launcher errors
    #[error("Failed to launch {project}: {reason}")]
    Launch { project: String, reason: String },
}

impl MailpackError {
    pub(crate) fn transport(operation: &'static str, err: impl std::fmt::Display) -> Self {
        MailpackError::Transport {
            operation,
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MailpackError>;
