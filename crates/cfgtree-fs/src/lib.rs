//! Filesystem layer for cfgtree
//!
//! Provides normalized path handling, modification-time queries, atomic
//! writes for cache artifacts and a format-agnostic settings store.

pub mod error;
pub mod io;
pub mod path;
pub mod settings;

pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use settings::SettingsStore;
