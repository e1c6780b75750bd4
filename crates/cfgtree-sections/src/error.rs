//! Error types for cfgtree-sections

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] cfgtree_fs::Error),

    #[error("cfg file does not exist: {path}")]
    FileNotFound { path: PathBuf },

    #[error("circular cfg import found in {file}: {import}")]
    CircularImport { file: PathBuf, import: PathBuf },

    #[error("invalid range specification '{token}': {message}")]
    InvalidRange { token: String, message: String },

    #[error("invalid template section '{name}': {message}")]
    InvalidTemplate { name: String, message: String },

    #[error("failed to encode section cache: {0}")]
    CacheEncode(serde_json::Error),

    #[error("invalid empty heading found at section {seq}")]
    EmptySectionName { seq: usize },
}

impl Error {
    pub(crate) fn range(token: &str, message: impl Into<String>) -> Self {
        Self::InvalidRange {
            token: token.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn template(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            name: name.to_string(),
            message: message.into(),
        }
    }
}
