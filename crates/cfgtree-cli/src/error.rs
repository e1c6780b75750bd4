//! Error types for cfgtree-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from cfgtree-core
    #[error(transparent)]
    Core(#[from] cfgtree_core::Error),

    /// Error from cfgtree-sections
    #[error(transparent)]
    Sections(#[from] cfgtree_sections::Error),

    /// Error from cfgtree-fs
    #[error(transparent)]
    Fs(#[from] cfgtree_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
