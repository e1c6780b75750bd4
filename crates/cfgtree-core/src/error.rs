//! Error types for cfgtree-core

use std::path::PathBuf;

/// Result type for cfgtree-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving cfg files and binding parameters.
///
/// Every variant is fatal for the resolution that raised it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cfg file does not exist: {path}")]
    FileNotFound { path: PathBuf },

    #[error("section {section} not found in {file}")]
    SectionNotFound { section: String, file: String },

    #[error("{count} substitution sections found for {section} in {file}")]
    AmbiguousSubstitution {
        section: String,
        file: String,
        count: usize,
    },

    #[error("invalid empty section {section} in {file} (lines {start} -> {end})")]
    InvalidEmptySection {
        section: String,
        file: String,
        start: usize,
        end: usize,
    },

    #[error("invalid cfg sections provided for {file}: {}", sections.join(", "))]
    InvalidSections { file: String, sections: Vec<String> },

    #[error("incremental value specified for {name} of non-accumulable type {kind}")]
    AccumulateScalar { name: String, kind: String },

    #[error("invalid param name {name} in argument {arg}")]
    UnknownParam { name: String, arg: String },

    #[error("invalid argument {arg}: {message}")]
    InvalidArgument { arg: String, message: String },

    #[error("invalid value '{value}' for {name}: {message}")]
    InvalidValue {
        name: String,
        value: String,
        message: String,
    },

    #[error("cannot substitute {token} in section {section}: {message}")]
    Placeholder {
        token: String,
        section: String,
        message: String,
    },

    // Transparent wrappers for underlying crate errors
    /// Section indexing error from cfgtree-sections
    #[error(transparent)]
    Sections(#[from] cfgtree_sections::Error),

    /// Filesystem error from cfgtree-fs
    #[error(transparent)]
    Fs(#[from] cfgtree_fs::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_value(
        name: &str,
        value: &str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(arg: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg: arg.to_string(),
            message: message.into(),
        }
    }
}
